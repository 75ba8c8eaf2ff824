//! End-to-end scenarios through the public `travelog` API
//!
//! Each test opens a record book in a scratch directory, mutates it, saves,
//! and reopens it from disk.

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use travelog::{
    BookConfig, BookError, CodecKind, LoadError, Person, RecordBook, ReferencePolicy, Ticket,
    TicketDetails,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn jan() -> Person {
    Person::new(
        "Jan de Boer",
        "M",
        date(1990, 1, 1),
        "Amsterdam",
        "Dutch",
        123456789,
        "NL1234567",
    )
}

fn traveller(name: &str, id_number: i32) -> Person {
    Person::new(name, "F", date(1979, 6, 3), "Utrecht", "Dutch", id_number, "NL7654321")
}

fn trip(destination: &str) -> TicketDetails {
    TicketDetails::new(
        destination,
        date(2024, 7, 1),
        date(2024, 7, 14),
        120.5,
        true,
        "window seat",
    )
}

fn reopen(dir: &TempDir, config: BookConfig) -> RecordBook {
    let mut book = RecordBook::open_with_config(dir.path(), config).unwrap();
    book.load().unwrap();
    book
}

#[test]
fn jan_de_boer_text_file_is_one_line() {
    let dir = TempDir::new().unwrap();
    let config = BookConfig::uniform(CodecKind::Text);
    let mut book = RecordBook::open_with_config(dir.path(), config).unwrap();
    book.persons_mut().add_or_update(jan());
    book.tickets_mut().add_or_update(Ticket::new(jan(), trip("Barcelona")));
    book.save().unwrap();

    let persons = fs::read_to_string(dir.path().join("Persons.txt")).unwrap();
    assert_eq!(
        persons,
        "Jan de Boer;M;01-01-1990;Amsterdam;Dutch;123456789;NL1234567\n"
    );
    let tickets = fs::read_to_string(dir.path().join("Tickets.txt")).unwrap();
    assert_eq!(tickets, "0;Barcelona;01-07-2024;14-07-2024;120.50;true;window seat\n");

    let book = reopen(&dir, config);
    assert_eq!(book.persons().get_all(), &[jan()]);
    let tickets: Vec<&Ticket> = book.tickets_for(&jan()).collect();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].details, trip("Barcelona"));
}

#[test]
fn every_format_reloads_what_it_saved() {
    for kind in CodecKind::ALL {
        let dir = TempDir::new().unwrap();
        let config = BookConfig::uniform(kind);
        let mut book = RecordBook::open_with_config(dir.path(), config).unwrap();
        let people = [jan(), traveller("Eva Bakker", 2), traveller("Noor Vos", 3)];
        for p in &people {
            book.persons_mut().add_or_update(p.clone());
        }
        for (i, p) in people.iter().enumerate().rev() {
            book.tickets_mut()
                .add_or_update(Ticket::new(p.clone(), trip(&format!("Stop {}", i))));
        }
        book.tickets_mut().add_or_update(Ticket::unowned(trip("Nowhere")));
        book.save().unwrap();

        let reloaded = reopen(&dir, config);
        assert_eq!(reloaded.persons().get_all(), book.persons().get_all(), "{}", kind);
        assert_eq!(reloaded.tickets().get_all(), book.tickets().get_all(), "{}", kind);
    }
}

#[test]
fn mixed_formats_from_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("travelog.toml"),
        "persons_format = \"object\"\ntickets_format = \"binary\"\n",
    )
    .unwrap();

    let mut book = RecordBook::open(dir.path()).unwrap();
    book.persons_mut().add_or_update(jan());
    book.tickets_mut().add_or_update(Ticket::new(jan(), trip("Oslo")));
    book.save().unwrap();
    assert!(dir.path().join("Persons.obj").exists());
    assert!(dir.path().join("Tickets.dat").exists());

    let mut reopened = RecordBook::open(dir.path()).unwrap();
    assert!(reopened.load().unwrap().is_clean());
    assert_eq!(reopened.tickets_for(&jan()).count(), 1);
}

#[test]
fn empty_data_directory_loads_empty_in_every_format() {
    for kind in CodecKind::ALL {
        let dir = TempDir::new().unwrap();
        let mut book = RecordBook::open_with_config(dir.path(), BookConfig::uniform(kind)).unwrap();
        let report = book.load().unwrap();

        assert_eq!(report.persons.loaded, 0, "{}", kind);
        assert_eq!(report.tickets.loaded, 0, "{}", kind);
        assert!(book.persons().is_empty());
        assert!(book.tickets().is_empty());
    }
}

#[test]
fn removing_a_person_and_saving_persons_only_shifts_tickets() {
    let dir = TempDir::new().unwrap();
    let config = BookConfig::uniform(CodecKind::Binary);
    let mut book = RecordBook::open_with_config(dir.path(), config).unwrap();
    let first = traveller("First", 1);
    let second = traveller("Second", 2);
    book.persons_mut().add_or_update(first.clone());
    book.persons_mut().add_or_update(second.clone());
    book.tickets_mut().add_or_update(Ticket::new(first.clone(), trip("Rome")));
    book.save().unwrap();

    book.persons_mut().remove(&first);
    book.persons().save().unwrap();

    let reloaded = reopen(&dir, config);
    let ticket = &reloaded.tickets().get_all()[0];
    assert_eq!(ticket.belongs_to, Some(second));
}

#[test]
fn saving_both_stores_after_removal_drops_the_reference() {
    let dir = TempDir::new().unwrap();
    let config = BookConfig::uniform(CodecKind::Object);
    let mut book = RecordBook::open_with_config(dir.path(), config).unwrap();
    let first = traveller("First", 1);
    book.persons_mut().add_or_update(first.clone());
    book.persons_mut().add_or_update(traveller("Second", 2));
    book.tickets_mut().add_or_update(Ticket::new(first.clone(), trip("Rome")));

    book.persons_mut().remove(&first);
    book.save().unwrap();

    let reloaded = reopen(&dir, config);
    assert_eq!(reloaded.tickets().get_all()[0].belongs_to, None);
}

#[test]
fn reject_policy_fails_on_dangling_key() {
    let dir = TempDir::new().unwrap();
    let keep = BookConfig::uniform(CodecKind::Text);
    let mut book = RecordBook::open_with_config(dir.path(), keep).unwrap();
    book.persons_mut().add_or_update(jan());
    book.tickets_mut().add_or_update(Ticket::new(jan(), trip("Paris")));
    book.save().unwrap();
    fs::write(dir.path().join("Persons.txt"), "").unwrap();

    let lenient = reopen(&dir, keep);
    assert!(lenient.tickets().get_all()[0].belongs_to.is_none());

    let reject = BookConfig {
        dangling_references: ReferencePolicy::Reject,
        ..keep
    };
    let mut strict = RecordBook::open_with_config(dir.path(), reject).unwrap();
    let err = strict.load().unwrap_err();
    assert!(matches!(
        err,
        BookError::Load {
            store: "tickets",
            source: LoadError::MissingReference { index: 0, key: 0, .. },
        }
    ));
}

#[test]
fn malformed_line_is_skipped_and_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Persons.txt"),
        "Jan de Boer;M;01-01-1990;Amsterdam;Dutch;123456789;NL1234567\n\
         broken line without enough fields\n",
    )
    .unwrap();

    let mut book =
        RecordBook::open_with_config(dir.path(), BookConfig::uniform(CodecKind::Text)).unwrap();
    let report = book.load().unwrap();

    assert_eq!(book.persons().get_all(), &[jan()]);
    assert_eq!(report.persons.skipped.len(), 1);
    assert_eq!(report.persons.skipped[0].line, 2);
    assert!(!report.is_clean());
}

#[test]
fn object_graph_zero_count_fails_the_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Persons.obj"), 0i32.to_be_bytes()).unwrap();

    let mut book =
        RecordBook::open_with_config(dir.path(), BookConfig::uniform(CodecKind::Object)).unwrap();
    let err = book.load().unwrap_err();
    assert!(matches!(
        err,
        BookError::Load {
            store: "persons",
            source: LoadError::Malformed { .. },
        }
    ));
}
