//! Wishlist persistence through the worker and the JSON file.

use kirjastokaveri::domain::{Book, SavedBook};
use kirjastokaveri::storage::JsonStorage;
use kirjastokaveri::worker::{KaveriWorker, WorkerMessage, WorkerResponse};
use tempfile::TempDir;

fn saved(id: &str, title: &str, saved_at: i64) -> SavedBook {
    SavedBook {
        saved_at,
        ..SavedBook::from_book(&Book::new(id, title, "Tove Jansson"))
    }
}

fn open_worker(dir: &TempDir) -> KaveriWorker {
    let storage = JsonStorage::new(dir.path().join("wishlist.json")).unwrap();
    KaveriWorker::with_storage(Box::new(storage))
}

fn ids(response: &WorkerResponse) -> Vec<&str> {
    match response {
        WorkerResponse::WishlistLoaded { books } => {
            books.iter().map(|b| b.book_id.as_str()).collect()
        }
        WorkerResponse::Error { message } => panic!("worker error: {message}"),
    }
}

#[test]
fn wishlist_survives_reopen_newest_first() {
    let dir = TempDir::new().unwrap();

    {
        let mut worker = open_worker(&dir);
        worker.handle_message(WorkerMessage::save_book(saved("a", "Muumipeikko", 100)));
        worker.handle_message(WorkerMessage::save_book(saved("b", "Taikatalvi", 300)));
        let response =
            worker.handle_message(WorkerMessage::save_book(saved("c", "Kesäkirja", 200)));
        assert_eq!(ids(&response), ["b", "c", "a"]);
    }

    let mut reopened = open_worker(&dir);
    let response = reopened.handle_message(WorkerMessage::load_wishlist());
    assert_eq!(ids(&response), ["b", "c", "a"]);

    let WorkerResponse::WishlistLoaded { books } = response else {
        unreachable!();
    };
    assert_eq!(books[1].title, "Kesäkirja");
    assert_eq!(books[1].saved_at, 200);
}

#[test]
fn removal_is_persisted() {
    let dir = TempDir::new().unwrap();

    {
        let mut worker = open_worker(&dir);
        worker.handle_message(WorkerMessage::save_book(saved("a", "Muumipeikko", 1)));
        worker.handle_message(WorkerMessage::save_book(saved("b", "Taikatalvi", 2)));
        let response = worker.handle_message(WorkerMessage::remove_book("a".to_string()));
        assert_eq!(ids(&response), ["b"]);
    }

    let mut reopened = open_worker(&dir);
    assert_eq!(ids(&reopened.handle_message(WorkerMessage::load_wishlist())), ["b"]);
}

#[test]
fn corrupt_file_is_reported_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wishlist.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(JsonStorage::new(path.clone()).is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}
