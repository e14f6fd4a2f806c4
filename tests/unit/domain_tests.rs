/// Domain validation through the public API
use chrono::NaiveDate;
use habit_journal::*;

#[test]
fn test_habit_title_rules() {
    let habit = Habit::new("  Exercise ", Some("Daily".to_string())).unwrap();
    assert_eq!(habit.title, "Exercise");
    assert_eq!(habit.description.as_deref(), Some("Daily"));

    assert!(Habit::new("   ", None).is_err());
    assert!(Habit::new(&"x".repeat(MAX_TITLE_CHARS), None).is_ok());
    assert!(Habit::new(&"x".repeat(MAX_TITLE_CHARS + 1), None).is_err());
}

#[test]
fn test_detail_notes_limit_counts_characters() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
    let notes = |n: usize| DetailInput {
        notes: Some("é".repeat(n)),
        ..Default::default()
    };

    assert!(Detail::new(HabitId::new(), date, notes(MAX_NOTES_CHARS)).is_ok());
    assert!(matches!(
        Detail::new(HabitId::new(), date, notes(MAX_NOTES_CHARS + 1)),
        Err(DomainError::InvalidValue { .. })
    ));
}

#[test]
fn test_blank_photo_path_means_no_photo() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
    let detail = Detail::new(
        HabitId::new(),
        date,
        DetailInput {
            photo_path: Some("  ".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(detail.photo_path, None);
}

#[test]
fn test_date_and_id_parsing() {
    assert_eq!(
        parse_date("2024-02-29").unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert!(matches!(parse_date("2023-02-29"), Err(DomainError::InvalidDate(_))));
    assert!(matches!(parse_date("18/03/2024"), Err(DomainError::InvalidDate(_))));

    let id = HabitId::new();
    assert_eq!(parse_habit_id(&id.to_string()).unwrap(), id);
    assert!(matches!(parse_habit_id("abc"), Err(DomainError::InvalidId(_))));
}

#[test]
fn test_todo_defaults_and_title() {
    let todo = NewTodo::new("  Buy milk ").validated().unwrap();
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.priority, DEFAULT_PRIORITY);
    assert!(!todo.completed);

    assert!(NewTodo::new("x".repeat(MAX_TODO_TITLE_CHARS + 1)).validated().is_err());
}
