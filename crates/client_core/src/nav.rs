use std::fmt;

/// Top-level pages of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    CarsList,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Home, Route::CarsList];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::CarsList => "/cars-list",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::CarsList => "Cars",
        }
    }

    /// Resolves a path; anything unrecognized lands on Home. Query strings
    /// and fragments are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        if path == "/cars-list" || path.starts_with("/cars-list/") {
            Self::CarsList
        } else {
            Self::Home
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/cars-list"), Route::CarsList);
        assert_eq!(Route::from_path("/cars-list/"), Route::CarsList);
        assert_eq!(Route::from_path("/cars-list?id=3"), Route::CarsList);
    }

    #[test]
    fn unknown_paths_fall_back_to_home() {
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/trucks"), Route::Home);
        assert_eq!(Route::from_path("/cars-listing"), Route::Home);
    }

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
