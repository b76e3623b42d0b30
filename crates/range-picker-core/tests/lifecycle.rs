use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use range_picker_core::{
    AdapterCall, DateRange, FocusTarget, HeadlessAdapter, HostEventKind, InputEvent, InputField,
    PickerCommand, PickerError, PickerOptions, RangeCoordinator,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn picker(options: PickerOptions) -> RangeCoordinator<HeadlessAdapter> {
    let mut picker = RangeCoordinator::new(HeadlessAdapter::new(), options).unwrap();
    picker.initialize();
    picker
}

fn set_attribute(picker: &mut RangeCoordinator<HeadlessAdapter>, name: &str, value: Option<&str>) {
    picker.execute(PickerCommand::SetAttribute {
        name: name.to_string(),
        value: value.map(str::to_string),
    });
}

#[test]
fn test_missing_inputs_fails_construction() {
    let err = RangeCoordinator::new(HeadlessAdapter::without_inputs(), PickerOptions::default())
        .err()
        .unwrap();
    assert_eq!(err, PickerError::MissingInputs);
    assert_eq!(err.to_string(), "the date range picker requires two inputs");
}

#[test]
fn test_initialize_runs_once_and_wires_accessibility() {
    let mut picker = picker(PickerOptions::default());
    let calls = picker.adapter().calls().len();

    picker.initialize();

    assert_eq!(picker.adapter().calls().len(), calls);
    let from = picker.adapter().input(InputField::From);
    assert_eq!(from.attribute("role"), Some("combobox"));
    assert_eq!(from.attribute("aria-haspopup"), Some("true"));
    assert_eq!(from.attribute("aria-expanded"), Some("false"));
    assert_eq!(
        picker.adapter().input(InputField::To).attribute("aria-label"),
        Some("To date")
    );
}

#[test]
fn test_initially_disabled_picker_disables_every_surface() {
    let picker = picker(PickerOptions::default().disabled(true));

    assert!(picker.is_disabled());
    assert!(picker.adapter().input(InputField::From).disabled);
    assert!(picker.adapter().input(InputField::To).disabled);
    assert!(picker.adapter().toggle_disabled());
}

#[test]
fn test_disabling_closes_calendar_and_reenabling_restores_input() {
    let mut picker = picker(PickerOptions::default().masked(false));
    picker.execute(PickerCommand::Open);

    picker.execute(PickerCommand::SetDisabled(true));

    assert!(!picker.is_open());
    assert_eq!(
        picker.adapter().event_kinds(),
        vec![HostEventKind::Open, HostEventKind::Close]
    );
    assert_eq!(
        picker.adapter().input(InputField::To).attribute("aria-disabled"),
        Some("true")
    );
    picker.handle_event(InputEvent::Input {
        field: InputField::From,
        text: "01/10/2024".to_string(),
    });
    assert_eq!(picker.from(), None);

    picker.execute(PickerCommand::SetDisabled(false));
    assert!(!picker.adapter().input(InputField::From).disabled);
    assert!(!picker.adapter().toggle_disabled());
    picker.handle_event(InputEvent::Input {
        field: InputField::From,
        text: "01/10/2024".to_string(),
    });
    assert_eq!(picker.from(), Some(d(2024, 1, 10)));
}

#[test]
fn test_mask_toggling_never_leaks_instances() {
    let mut picker = picker(PickerOptions::default());
    assert_eq!(picker.adapter().live_masks(), 2);

    picker.execute(PickerCommand::SetMasked(false));
    assert!(!picker.is_masked());
    assert_eq!(picker.adapter().live_masks(), 0);

    picker.execute(PickerCommand::SetMasked(true));
    assert_eq!(picker.adapter().live_masks(), 2);

    picker.adapter_mut().clear_calls();
    picker.execute(PickerCommand::SetMasked(true));
    assert!(picker.adapter().calls().is_empty());
}

#[test]
fn test_unmasking_reformats_existing_text() {
    let mut picker = picker(PickerOptions::default());
    picker.adapter_mut().type_text(InputField::From, "1/10/2024");

    picker.execute(PickerCommand::SetMasked(false));

    assert_eq!(picker.adapter().input_text(InputField::From), "01/10/2024");
}

#[test]
fn test_mask_format_is_shown_only_while_focused() {
    let mut picker = picker(PickerOptions::default().show_mask_format(true));
    let shown = |picker: &RangeCoordinator<HeadlessAdapter>| {
        picker
            .adapter()
            .input(InputField::From)
            .mask
            .as_ref()
            .map(|mask| mask.options.show_mask_format)
    };
    assert_eq!(shown(&picker), Some(false));

    picker.adapter_mut().set_focus(Some(InputField::From));
    picker.handle_event(InputEvent::Focus {
        field: InputField::From,
    });
    assert_eq!(shown(&picker), Some(true));
    assert_eq!(picker.adapter().selected(), Some(InputField::From));

    picker.adapter_mut().set_focus(None);
    picker.handle_event(InputEvent::Blur {
        field: InputField::From,
        related: Some(FocusTarget::Outside),
    });
    assert_eq!(shown(&picker), Some(false));
    assert_eq!(picker.adapter().live_masks(), 2);
}

#[test]
fn test_destroy_releases_everything() {
    let mut picker = picker(PickerOptions::default());
    picker
        .adapter_mut()
        .add_listener(HostEventKind::Change, |_| {});
    picker.execute(PickerCommand::Open);

    picker.destroy();

    assert!(!picker.is_open());
    assert!(!picker.adapter().calendar().attached);
    assert_eq!(picker.adapter().live_masks(), 0);
    assert_eq!(picker.adapter().listener_count(), 0);
    assert!(picker.adapter().is_destroyed());
    assert_eq!(picker.adapter().calls().last(), Some(&AdapterCall::Destroy));
}

#[test]
fn test_attributes_accept_formatted_and_iso_dates() {
    let mut picker = picker(PickerOptions::default());

    set_attribute(&mut picker, "from", Some("01/10/2024"));
    set_attribute(&mut picker, "to", Some("2024-01-20"));
    assert_eq!(picker.value(), DateRange::between(d(2024, 1, 10), d(2024, 1, 20)));

    set_attribute(&mut picker, "end-value", Some("2024-01-25"));
    assert_eq!(picker.to(), Some(d(2024, 1, 25)));
    assert_eq!(picker.adapter().input_text(InputField::To), "01/25/2024");
}

#[test]
fn test_attribute_removal_and_garbage_clear_the_side() {
    let mut picker = picker(
        PickerOptions::default().with_value(DateRange::between(d(2024, 1, 10), d(2024, 1, 20))),
    );

    set_attribute(&mut picker, "to", None);
    assert_eq!(picker.value(), DateRange::starting(d(2024, 1, 10)));

    set_attribute(&mut picker, "from", Some("not a date"));
    assert_eq!(picker.value(), DateRange::empty());
}

#[test]
fn test_unobserved_attributes_are_ignored() {
    let mut picker = picker(PickerOptions::default());

    set_attribute(&mut picker, "placeholder", Some("2024-01-10"));

    assert_eq!(picker.value(), DateRange::empty());
    assert!(picker.adapter().event_log().is_empty());
}

#[test]
fn test_value_set_before_initialize_survives_initialization() {
    let mut picker =
        RangeCoordinator::new(HeadlessAdapter::new(), PickerOptions::default()).unwrap();
    picker.execute(PickerCommand::SetValue(DateRange::between(
        d(2024, 1, 10),
        d(2024, 1, 20),
    )));
    assert_eq!(picker.adapter().change_events().len(), 1);

    picker.initialize();

    assert_eq!(picker.value(), DateRange::between(d(2024, 1, 10), d(2024, 1, 20)));
    assert_eq!(picker.adapter().input_text(InputField::From), "01/10/2024");
    assert_eq!(picker.adapter().input_text(InputField::To), "01/20/2024");
    assert_eq!(picker.adapter().change_events().len(), 1);
}

#[test]
fn test_early_attribute_wins_over_configured_value_per_side() {
    let options =
        PickerOptions::default().with_value(DateRange::between(d(2024, 1, 10), d(2024, 1, 20)));
    let mut picker = RangeCoordinator::new(HeadlessAdapter::new(), options).unwrap();
    set_attribute(&mut picker, "to", Some("2024-01-25"));

    picker.initialize();

    assert_eq!(picker.value(), DateRange::between(d(2024, 1, 10), d(2024, 1, 25)));
}

#[test]
fn test_blur_outside_reinitializes_masks_despite_stale_focus() {
    let mut picker = picker(PickerOptions::default().show_mask_format(true));
    picker.adapter_mut().set_focus(Some(InputField::From));
    picker.handle_event(InputEvent::Focus {
        field: InputField::From,
    });
    let focused_mask = picker.adapter().input(InputField::From).mask.clone().unwrap();
    assert!(focused_mask.options.show_mask_format);

    // The host reports the blur before updating its own focus record.
    picker.handle_event(InputEvent::Blur {
        field: InputField::From,
        related: Some(FocusTarget::Outside),
    });

    let mask = picker.adapter().input(InputField::From).mask.clone().unwrap();
    assert_ne!(mask.id, focused_mask.id);
    assert!(!mask.options.show_mask_format);
}
