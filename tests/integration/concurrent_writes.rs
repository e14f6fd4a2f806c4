/// Racing writers on the same (habit, date) key
///
/// Each test opens two repositories on one database file, so the writers
/// hold separate SQLite connections and contend on the file lock.
use habit_journal::*;
use tempfile::TempDir;

const WRITERS: u32 = 16;

fn open_pair(dir: &TempDir) -> [SqliteRepository; 2] {
    let db_path = dir.path().join("journal.db");
    [
        SqliteRepository::new(db_path.clone(), PhotoStore::new(dir.path())).unwrap(),
        SqliteRepository::new(db_path, PhotoStore::new(dir.path())).unwrap(),
    ]
}

#[test]
fn test_racing_upserts_leave_one_achievement() {
    let dir = TempDir::new().unwrap();
    let repos = open_pair(&dir);
    let id = repos[0].create_habit("Exercise", None).unwrap().id.to_string();

    let outcomes: Vec<Result<Achievement, RepositoryError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|n| {
                let repo = &repos[(n % 2) as usize];
                let id = id.as_str();
                scope.spawn(move || repo.upsert_achievement(id, "2024-03-18", n % 3 == 0))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let ids: Vec<AchievementId> = outcomes.into_iter().map(|r| r.unwrap().id).collect();
    assert!(ids.iter().all(|a| *a == ids[0]));

    for repo in &repos {
        let stored = repo.list_achievements(&id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, ids[0]);
    }
}

#[test]
fn test_racing_detail_creates_admit_exactly_one() {
    let dir = TempDir::new().unwrap();
    let repos = open_pair(&dir);
    let id = repos[0].create_habit("Exercise", None).unwrap().id.to_string();

    let outcomes: Vec<Result<Detail, RepositoryError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|n| {
                let repo = &repos[(n % 2) as usize];
                let id = id.as_str();
                scope.spawn(move || {
                    repo.create_detail(
                        id,
                        "2024-03-18",
                        DetailInput {
                            duration_minutes: Some(n),
                            ..Default::default()
                        },
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let created = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::ConstraintViolation));
    assert_eq!(repos[1].list_details(&id).unwrap().len(), 1);
}
