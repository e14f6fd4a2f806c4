/// End-to-end repository scenarios against a file-backed database
use habit_journal::*;
use tempfile::TempDir;

fn open(dir: &TempDir) -> SqliteRepository {
    SqliteRepository::new(dir.path().join("journal.db"), PhotoStore::new(dir.path()))
        .expect("Failed to open repository")
}

#[test]
fn test_exercise_scenario() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir);

    let habit = repo.create_habit("Exercise", None).unwrap();
    let id = habit.id.to_string();
    assert!(habit.created_at <= chrono::Utc::now());

    let achieved = repo.upsert_achievement(&id, "2024-03-18", true).unwrap();
    assert!(achieved.achieved);

    let revised = repo.upsert_achievement(&id, "2024-03-18", false).unwrap();
    assert_eq!(revised.id, achieved.id);
    assert!(!revised.achieved);
    assert_eq!(repo.list_achievements(&id).unwrap().len(), 1);

    let detail = repo
        .create_detail(
            &id,
            "2024-03-18",
            DetailInput {
                notes: Some("ran 5k".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(detail.notes.as_deref(), Some("ran 5k"));

    assert!(repo.delete_habit(&id).unwrap());
    assert!(repo.list_details(&id).unwrap().is_empty());
    assert!(repo.list_achievements(&id).unwrap().is_empty());
    assert_eq!(repo.get_habit(&id).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_unknown_habit_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir);
    let kept = repo.create_habit("Read", None).unwrap();

    let deleted = repo.delete_habit(&HabitId::new().to_string()).unwrap();
    assert!(!deleted);
    assert_eq!(repo.list_habits().unwrap(), vec![kept]);
}

#[test]
fn test_invalid_identifier_is_not_not_found() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir);

    assert_eq!(repo.get_habit("not-a-uuid").unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(repo.delete_habit("not-a-uuid").unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(
        repo.list_details("not-a-uuid").unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_details_and_achievements_are_independent() {
    let dir = TempDir::new().unwrap();
    let repo = open(&dir);
    let id = repo.create_habit("Meditate", None).unwrap().id.to_string();

    // A detail does not need an achievement on the same day, and vice versa
    repo.create_detail(&id, "2024-03-18", DetailInput::default()).unwrap();
    repo.upsert_achievement(&id, "2024-03-19", true).unwrap();

    assert!(repo.delete_detail(&id, "2024-03-18").unwrap());
    assert_eq!(repo.list_achievements(&id).unwrap().len(), 1);
}

#[test]
fn test_cascade_removes_every_photo() {
    let dir = TempDir::new().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();
    for name in ["a.jpg", "b.jpg"] {
        std::fs::write(uploads.join(name), b"jpeg").unwrap();
    }

    let repo = open(&dir);
    let id = repo.create_habit("Sketch", None).unwrap().id.to_string();
    for (date, photo) in [("2024-03-18", "uploads/a.jpg"), ("2024-03-19", "uploads/b.jpg")] {
        repo.create_detail(
            &id,
            date,
            DetailInput {
                duration_minutes: Some(15),
                photo_path: Some(photo.to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    }

    assert!(repo.delete_habit(&id).unwrap());
    assert!(!uploads.join("a.jpg").exists());
    assert!(!uploads.join("b.jpg").exists());
}

#[tokio::test]
async fn test_server_reopens_existing_database() {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig::with_database(dir.path().join("journal.db"));

    let id = {
        let server = HabitJournalServer::new(config.clone()).await.unwrap();
        server.repository().create_habit("Stretch", None).unwrap().id.to_string()
    };

    let server = HabitJournalServer::new(config).await.unwrap();
    assert_eq!(server.repository().get_habit(&id).unwrap().title, "Stretch");
    assert_eq!(server.repository().photos().root(), dir.path());
}
