use chrono::{NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use range_picker_core::{
    AdapterCall, DateRange, FixedClock, HeadlessAdapter, HostEventKind, InputEvent, InputField,
    PickerCommand, PickerOptions, RangeCoordinator,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn picker(options: PickerOptions) -> RangeCoordinator<HeadlessAdapter> {
    let mut picker = RangeCoordinator::new(HeadlessAdapter::new(), options)
        .unwrap()
        .with_clock(FixedClock(d(2024, 6, 1)));
    picker.initialize();
    picker
}

fn with_value(range: DateRange) -> RangeCoordinator<HeadlessAdapter> {
    picker(PickerOptions::default().with_value(range))
}

#[test]
fn test_clear_empties_range_and_closes_calendar() {
    let mut picker = with_value(DateRange::between(d(2024, 1, 10), d(2024, 1, 20)));
    picker.execute(PickerCommand::Open);
    picker.adapter_mut().clear_calls();

    picker.handle_event(InputEvent::ClearClick);

    assert_eq!(picker.value(), DateRange::empty());
    assert!(!picker.is_open());
    assert_eq!(
        picker.adapter().event_kinds(),
        vec![HostEventKind::Change, HostEventKind::Close]
    );
    assert_eq!(picker.adapter().input_text(InputField::From), "");
    assert_eq!(picker.adapter().input_text(InputField::To), "");
    assert_eq!(picker.adapter().selected(), Some(InputField::From));
}

#[test]
fn test_clear_closes_even_when_canceled() {
    let mut picker = with_value(DateRange::between(d(2024, 1, 10), d(2024, 1, 20)));
    picker
        .adapter_mut()
        .add_listener(HostEventKind::Change, |ctx| ctx.prevent_default());
    picker.execute(PickerCommand::Open);

    picker.execute(PickerCommand::Clear);

    assert_eq!(picker.value(), DateRange::between(d(2024, 1, 10), d(2024, 1, 20)));
    assert!(!picker.is_open());
}

#[test]
fn test_today_while_closed_starts_new_range() {
    let mut picker = picker(PickerOptions::default());

    picker.execute(PickerCommand::Today);

    assert_eq!(picker.value(), DateRange::starting(d(2024, 6, 1)));
    assert_eq!(picker.adapter().input_text(InputField::From), "06/01/2024");
    assert_eq!(picker.adapter().calendar().active_date, Some(d(2024, 6, 1)));
}

#[test]
fn test_today_while_closed_discards_existing_to() {
    let mut picker = with_value(DateRange::between(d(2024, 5, 1), d(2024, 5, 10)));

    picker.execute(PickerCommand::Today);

    assert_eq!(picker.value(), DateRange::starting(d(2024, 6, 1)));
    assert_eq!(picker.adapter().input_text(InputField::To), "");
}

#[test]
fn test_today_while_open_with_same_from_is_a_no_op() {
    let mut picker = with_value(DateRange::starting(d(2024, 6, 1)));
    picker.execute(PickerCommand::Open);
    picker.adapter_mut().clear_calls();

    picker.handle_event(InputEvent::TodayClick);

    assert_eq!(picker.value(), DateRange::starting(d(2024, 6, 1)));
    assert!(picker.adapter().change_events().is_empty());
    assert_eq!(
        picker.adapter().calls(),
        &[AdapterCall::SetCalendarActiveDate(d(2024, 6, 1))]
    );
}

#[test]
fn test_today_while_open_preserves_to() {
    let mut picker = with_value(DateRange::between(d(2024, 5, 20), d(2024, 6, 10)));
    picker.execute(PickerCommand::Open);

    picker.execute(PickerCommand::Today);

    assert_eq!(picker.value(), DateRange::between(d(2024, 6, 1), d(2024, 6, 10)));
    assert!(picker.is_open());
    assert_eq!(
        picker.adapter().calendar().value,
        DateRange::between(d(2024, 6, 1), d(2024, 6, 10))
    );
    assert_eq!(picker.adapter().selected(), Some(InputField::To));
}

#[test]
fn test_today_while_open_rejected_when_to_precedes_today() {
    let mut picker = with_value(DateRange::between(d(2024, 5, 1), d(2024, 5, 10)));
    picker.execute(PickerCommand::Open);
    picker.adapter_mut().clear_calls();

    picker.execute(PickerCommand::Today);

    assert_eq!(picker.value(), DateRange::between(d(2024, 5, 1), d(2024, 5, 10)));
    assert!(picker.adapter().calls().is_empty());
}

#[test]
fn test_today_on_disabled_weekday_is_rejected() {
    // 2024-06-01 is a Saturday.
    let mut picker = picker(PickerOptions::default().with_disabled_days_of_week([Weekday::Sat]));

    picker.execute(PickerCommand::Today);

    assert_eq!(picker.value(), DateRange::empty());
    assert_eq!(picker.adapter().calendar().active_date, None);
}
