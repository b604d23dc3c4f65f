use super::*;

fn filled_form() -> CarForm {
    let mut form = CarForm::new();
    form.make = "Ford".to_string();
    form.model = "Focus".to_string();
    form.year = Some(2015);
    form.plate = "AB12".to_string();
    form
}

#[test]
fn defaults_match_a_fresh_form() {
    let form = CarForm::new();
    assert_eq!(form.year, Some(DEFAULT_YEAR));
    assert_eq!(form.plate_message(), DEFAULT_PLATE_MESSAGE);
    assert_eq!(form.plate_status(), PlateStatus::Default);
    assert!(!form.was_validated());
}

#[test]
fn empty_make_fails_and_marks_form_validated() {
    let mut form = filled_form();
    form.make.clear();

    let errors = form.begin_submit().expect_err("must be invalid");
    assert_eq!(errors, vec![ValidationError::Missing(FormField::Make)]);
    assert!(form.was_validated());
    assert_eq!(form.feedback(FormField::Make), Some("A car make is required."));
    assert_eq!(form.feedback(FormField::Model), None);
}

#[test]
fn valid_form_yields_draft_and_clears_validation_flag() {
    let mut form = filled_form();
    form.make.clear();
    let _ = form.begin_submit();
    form.make = "Ford".to_string();

    let draft = form.begin_submit().expect("valid");
    assert_eq!(
        draft,
        CarDraft {
            make: "Ford".to_string(),
            model: "Focus".to_string(),
            year: 2015,
            plate: "AB12".to_string(),
        }
    );
    assert!(!form.was_validated());
}

#[test]
fn plate_pattern_accepts_one_to_six_uppercase_alphanumerics() {
    for plate in ["A", "AB12", "ZZ9999", "123456"] {
        assert!(is_valid_plate(plate), "{plate} should be accepted");
    }
    for plate in ["", "ab12", "AB-12", "ABCDEFG", "AB 12", " AB12"] {
        assert!(!is_valid_plate(plate), "{plate:?} should be rejected");
    }
}

#[test]
fn plate_pattern_and_missing_plate_are_distinct() {
    let mut form = filled_form();
    form.plate = "ab12".to_string();
    assert_eq!(form.validate(), Err(vec![ValidationError::PlatePattern]));

    form.plate.clear();
    assert_eq!(
        form.validate(),
        Err(vec![ValidationError::Missing(FormField::Plate)])
    );
}

#[test]
fn year_bounds_are_inclusive() {
    let mut form = filled_form();
    form.year = Some(MIN_YEAR);
    assert!(form.validate().is_ok());
    form.year = Some(MAX_YEAR);
    assert!(form.validate().is_ok());

    form.year = Some(MIN_YEAR - 1);
    assert_eq!(
        form.validate(),
        Err(vec![ValidationError::YearOutOfRange {
            min: MIN_YEAR,
            max: MAX_YEAR
        }])
    );
}

#[test]
fn unparseable_year_text_counts_as_missing() {
    let mut form = filled_form();
    form.set_year_text("19x5");
    assert_eq!(form.year, None);
    assert_eq!(form.year_text(), "");
    assert_eq!(
        form.validate(),
        Err(vec![ValidationError::Missing(FormField::Year)])
    );

    form.set_year_text(" 1999 ");
    assert_eq!(form.year, Some(1999));
}

#[test]
fn make_longer_than_input_limit_is_rejected() {
    let mut form = filled_form();
    form.make = "Toyota".to_string();
    assert_eq!(
        form.validate(),
        Err(vec![ValidationError::TooLong {
            field: FormField::Make,
            max: MAKE_MAX_CHARS
        }])
    );
}

#[test]
fn rejection_keeps_fields_and_marks_plate_invalid() {
    let mut form = filled_form();
    form.begin_submit().expect("valid");

    form.apply_rejected("Plate already exists");

    assert_eq!(form.make, "Ford");
    assert_eq!(form.model, "Focus");
    assert_eq!(form.year, Some(2015));
    assert_eq!(form.plate, "AB12");
    assert_eq!(form.plate_message(), "Plate already exists");
    assert_eq!(form.plate_status(), PlateStatus::Invalid);
    assert_eq!(form.feedback(FormField::Plate), Some("Plate already exists"));
}

#[test]
fn success_resets_fields_message_and_status() {
    let mut form = filled_form();
    form.apply_rejected("Plate already exists");

    form.apply_created();

    assert_eq!(form, CarForm::default());
}
