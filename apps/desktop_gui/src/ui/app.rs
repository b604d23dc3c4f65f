use client_core::{
    form::{FormField, MAKE_MAX_CHARS},
    PlateStatus, Route,
};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::CarId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{apply_ui_event, CarsPageState, ShellState},
};

const INVALID_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);
const MUTED_COLOR: egui::Color32 = egui::Color32::from_rgb(140, 140, 150);

pub struct CarsApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    route: Route,
    shell: ShellState,
}

impl CarsApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, route: Route) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            route: Route::Home,
            shell: ShellState::default(),
        };
        app.navigate(route);
        app
    }

    /// Switches pages, mounting or unmounting the cars list as needed.
    fn navigate(&mut self, route: Route) {
        if route == self.route && route != Route::CarsList {
            return;
        }
        if self.route == Route::CarsList && route != Route::CarsList {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::UnmountCars,
                &mut self.shell.status,
            );
        }
        if route == Route::CarsList && self.route != Route::CarsList {
            self.shell.page = CarsPageState::default();
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::MountCars,
                &mut self.shell.status,
            );
        }
        tracing::debug!(from = %self.route, to = %route, "navigate");
        self.route = route;
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            // A late list update for a page that was already left is stale.
            if matches!(event, UiEvent::CarsChanged(_)) && self.route != Route::CarsList {
                continue;
            }
            apply_ui_event(&mut self.shell, event);
        }
    }

    fn show_nav_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_nav_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let mut target = None;
                    if ui
                        .selectable_label(self.route == Route::Home, egui::RichText::new("Home").strong())
                        .clicked()
                    {
                        target = Some(Route::Home);
                    }
                    ui.separator();
                    if ui
                        .selectable_label(self.route == Route::CarsList, Route::CarsList.title())
                        .clicked()
                    {
                        target = Some(Route::CarsList);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(self.route.path()).color(MUTED_COLOR));
                    });
                    if let Some(route) = target {
                        self.navigate(route);
                    }
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("app_status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(banner) = self.shell.banner.clone() {
                        ui.colored_label(INVALID_COLOR, banner.banner_text());
                        if ui.button("Dismiss").clicked() {
                            self.shell.banner = None;
                        }
                    } else {
                        ui.label(egui::RichText::new(&self.shell.status).color(MUTED_COLOR));
                    }
                });
            });
    }

    fn show_home(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.heading("Car roster");
            ui.add_space(8.0);
            ui.label("Keep track of makes, models, years and plates.");
            ui.add_space(12.0);
            if ui.button("Open the cars list").clicked() {
                self.navigate(Route::CarsList);
            }
        });
    }

    fn show_cars(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.heading("Cars");
            ui.add_space(16.0);
        });

        self.show_car_form(ui);
        ui.add_space(16.0);
        ui.separator();
        self.show_car_table(ui);
    }

    fn field_feedback(&self, ui: &mut egui::Ui, field: FormField) {
        match self.shell.page.form.feedback(field) {
            Some(text) => {
                ui.colored_label(INVALID_COLOR, egui::RichText::new(text).small());
            }
            None => {
                ui.label("");
            }
        }
    }

    fn show_car_form(&mut self, ui: &mut egui::Ui) {
        let mut submit = false;
        egui::Grid::new("car_form")
            .num_columns(4)
            .spacing(egui::vec2(16.0, 4.0))
            .show(ui, |ui| {
                for label in ["Make", "Model", "Year", "Plate"] {
                    ui.label(label);
                }
                ui.end_row();

                let page = &mut self.shell.page;
                ui.add(
                    egui::TextEdit::singleline(&mut page.form.make)
                        .char_limit(MAKE_MAX_CHARS)
                        .desired_width(120.0),
                );
                ui.add(egui::TextEdit::singleline(&mut page.form.model).desired_width(160.0));

                let mut year_text = page.year_input.clone();
                if ui
                    .add(egui::TextEdit::singleline(&mut year_text).desired_width(70.0))
                    .changed()
                {
                    page.set_year_input(year_text);
                }

                let plate_invalid = page.form.plate_status() == PlateStatus::Invalid;
                let mut plate_edit = egui::TextEdit::singleline(&mut page.form.plate)
                    .hint_text("AB12")
                    .desired_width(90.0);
                if plate_invalid {
                    plate_edit = plate_edit.text_color(INVALID_COLOR);
                }
                let plate_response = ui.add(plate_edit);
                if plate_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.end_row();

                for field in [
                    FormField::Make,
                    FormField::Model,
                    FormField::Year,
                    FormField::Plate,
                ] {
                    self.field_feedback(ui, field);
                }
                ui.end_row();
            });

        if self.shell.page.plate_hint_visible() {
            ui.label(
                egui::RichText::new(self.shell.page.form.plate_message())
                    .small()
                    .color(MUTED_COLOR),
            );
        }

        ui.add_space(8.0);
        let button = egui::Button::new("Add car").min_size(egui::vec2(ui.available_width(), 32.0));
        if ui
            .add_enabled(!self.shell.page.create_in_flight, button)
            .clicked()
        {
            submit = true;
        }

        if submit {
            if let Some(draft) = self.shell.page.begin_submit() {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CreateCar { draft },
                    &mut self.shell.status,
                );
            }
        }
    }

    fn show_car_table(&mut self, ui: &mut egui::Ui) {
        let mut delete: Option<CarId> = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("cars_table")
                    .num_columns(6)
                    .striped(true)
                    .spacing(egui::vec2(24.0, 6.0))
                    .show(ui, |ui| {
                        for header in ["ID", "Make", "Model", "Year", "Plate", "Delete"] {
                            ui.label(egui::RichText::new(header).strong());
                        }
                        ui.end_row();

                        for car in &self.shell.page.cars {
                            ui.label(car.id.to_string());
                            ui.label(&car.make);
                            ui.label(&car.model);
                            ui.label(car.year.to_string());
                            ui.label(&car.plate);
                            let delete_button = egui::Button::new(
                                egui::RichText::new("Delete").color(egui::Color32::WHITE),
                            )
                            .fill(INVALID_COLOR);
                            if ui.add(delete_button).clicked() {
                                delete = Some(car.id);
                            }
                            ui.end_row();
                        }
                    });
            });

        if let Some(id) = delete {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::DeleteCar { id },
                &mut self.shell.status,
            );
        }
    }
}

impl CarsPageState {
    /// The informational plate hint shows until a validation or service
    /// error takes its place under the field.
    fn plate_hint_visible(&self) -> bool {
        self.form.feedback(FormField::Plate).is_none()
    }
}

impl eframe::App for CarsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_nav_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.route {
            Route::Home => self.show_home(ui),
            Route::CarsList => self.show_cars(ui),
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
