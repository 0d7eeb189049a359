use std::fs;
use std::path::PathBuf;

use intake_persistence::{FileSessionStore, Role, SessionManager, SessionStore, UserSession, SESSION_KEY};

fn scratch_path() -> PathBuf {
    std::env::temp_dir().join(format!("intake-session-{}", uuid::Uuid::new_v4()))
                        .join("session.json")
}

#[test]
fn values_survive_reopen() {
    let path = scratch_path();
    {
        let store = FileSessionStore::open(&path).unwrap();
        store.set("theme", "dark").unwrap();
        store.set("lang", "es").unwrap();
        store.remove("lang").unwrap();
    }
    let reopened = FileSessionStore::open(&path).unwrap();
    assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(reopened.get("lang").unwrap(), None);
    assert!(!path.with_extension("tmp").exists());
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn missing_file_is_empty_store() {
    let store = FileSessionStore::open(scratch_path()).unwrap();
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    store.remove(SESSION_KEY).unwrap();
}

#[test]
fn session_written_as_json_record() {
    let path = scratch_path();
    let mgr = SessionManager::new(FileSessionStore::open(&path).unwrap());
    mgr.login(UserSession::new(Role::Patient, "ana@example.com").named("Ana")
                                                                .with_uid("g-123")
                                                                .via("google"))
       .unwrap();

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let record: serde_json::Value = serde_json::from_str(on_disk[SESSION_KEY].as_str().unwrap()).unwrap();
    assert_eq!(record["name"], "Ana");
    assert_eq!(record["uid"], "g-123");

    let again = SessionManager::new(FileSessionStore::open(&path).unwrap());
    assert_eq!(again.display_name().unwrap(), "Ana");
    again.logout().unwrap();
    assert!(again.current().unwrap().is_none());
    let _ = fs::remove_dir_all(path.parent().unwrap());
}
