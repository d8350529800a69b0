use super::*;

fn entry(name: &str, message: &str, day: u32) -> GuestbookEntry {
    GuestbookEntry {
        name: name.into(),
        message: message.into(),
        date: NaiveDate::from_ymd_opt(2026, 10, day).expect("date"),
    }
}

fn rsvp(user: &str, name: &str, attendance: Attendance) -> RsvpRequest {
    RsvpRequest {
        user_id: UserId::new(user),
        name: name.into(),
        side: Side::Groom,
        attendance,
        meal_type: MealType::Adult,
        phone: Some("010-0000-0000".into()),
        memo: None,
        relationship: "friend".into(),
        gift_amount: 50_000,
        invitation_sent: true,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("invitation_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn lists_guestbook_entries_newest_first() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let owner = UserId::new("owner");
    storage
        .insert_guestbook_entry(&owner, &entry("first", "hello", 1))
        .await
        .expect("first");
    storage
        .insert_guestbook_entry(&owner, &entry("second", "congrats", 2))
        .await
        .expect("second");

    let entries = storage
        .list_guestbook_entries(&owner)
        .await
        .expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], entry("second", "congrats", 2));
    assert_eq!(entries[1], entry("first", "hello", 1));
}

#[tokio::test]
async fn guestbook_entries_are_scoped_by_user() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_guestbook_entry(&UserId::new("a"), &entry("kim", "hi", 3))
        .await
        .expect("insert");

    let other = storage
        .list_guestbook_entries(&UserId::new("b"))
        .await
        .expect("entries");
    assert!(other.is_empty());
}

#[tokio::test]
async fn delete_only_removes_entries_of_owner() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let owner = UserId::new("owner");
    let id = storage
        .insert_guestbook_entry(&owner, &entry("lee", "best wishes", 4))
        .await
        .expect("insert");

    let removed = storage
        .delete_guestbook_entry(&UserId::new("intruder"), id)
        .await
        .expect("delete");
    assert!(!removed);

    let removed = storage
        .delete_guestbook_entry(&owner, id)
        .await
        .expect("delete");
    assert!(removed);
    assert!(storage
        .list_stored_guestbook_entries(&owner)
        .await
        .expect("entries")
        .is_empty());
}

#[tokio::test]
async fn stores_rsvp_and_reads_it_back() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let request = rsvp("owner", "park", Attendance::Confirmed);
    let id = storage.insert_rsvp(&request).await.expect("insert");

    let records = storage
        .list_rsvps(&UserId::new("owner"))
        .await
        .expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].request, request);
}

#[tokio::test]
async fn summary_tallies_attendance() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for (name, attendance) in [
        ("a", Attendance::Confirmed),
        ("b", Attendance::Confirmed),
        ("c", Attendance::Declined),
    ] {
        storage
            .insert_rsvp(&rsvp("owner", name, attendance))
            .await
            .expect("insert");
    }
    storage
        .insert_rsvp(&rsvp("someone-else", "d", Attendance::Confirmed))
        .await
        .expect("insert");

    let summary = storage
        .rsvp_summary(&UserId::new("owner"))
        .await
        .expect("summary");
    assert_eq!(summary.total, 3);
    assert_eq!(summary.confirmed, 2);
    assert_eq!(summary.declined, 1);
    assert_eq!(summary.adult_meals, 2);
    assert_eq!(summary.gift_total, 150_000);
}
