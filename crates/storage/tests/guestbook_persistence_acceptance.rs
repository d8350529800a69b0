use chrono::NaiveDate;
use shared::{domain::UserId, protocol::GuestbookEntry};
use storage::Storage;

#[tokio::test]
async fn guestbook_entries_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("data").join("invitations.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));
    let owner = UserId::new("wedding-2026");
    let entry = GuestbookEntry {
        name: "Kim".into(),
        message: "Congrats".into(),
        date: NaiveDate::from_ymd_opt(2026, 10, 15).expect("date"),
    };

    {
        let storage = Storage::new(&database_url).await.expect("db");
        storage
            .insert_guestbook_entry(&owner, &entry)
            .await
            .expect("insert");
        storage.pool().close().await;
    }

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let entries = reopened
        .list_guestbook_entries(&owner)
        .await
        .expect("entries");
    assert_eq!(entries, vec![entry]);
}
