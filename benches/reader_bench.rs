use cookiecleaner::browsers::BrowserKind;
use cookiecleaner::paths::StoragePaths;
use cookiecleaner::storage::StorageReader;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rusqlite::{params, Connection};
use std::path::Path;

fn chrome_store(path: &Path, rows: usize) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE cookies (host_key TEXT, name TEXT, value TEXT, path TEXT,
         expires_utc INTEGER, encrypted_value BLOB)",
    )
    .unwrap();
    let tx = conn.unchecked_transaction().unwrap();
    for i in 0..rows {
        tx.execute(
            "INSERT INTO cookies VALUES (?1, ?2, ?3, '/', 13400000000000000, X'763130')",
            params![format!("host{}.example", i % 50), format!("c{i}"), "x".repeat(64)],
        )
        .unwrap();
    }
    tx.commit().unwrap();
}

fn benchmark_reader(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("Cookies");
    chrome_store(&db, 500);
    let paths = StoragePaths {
        cookie_db: Some(db),
        ..Default::default()
    };
    let target = BrowserKind::Chrome.target();

    let reader = StorageReader::new(100);
    c.bench_function("read_cookies_100_of_500", |b| {
        b.iter(|| black_box(reader.read_cookies(target, black_box(&paths)).unwrap()))
    });

    let unlimited = StorageReader::new(500);
    c.bench_function("read_cookies_500_of_500", |b| {
        b.iter(|| black_box(unlimited.read_cookies(target, black_box(&paths)).unwrap()))
    });

    c.bench_function("count_500", |b| {
        b.iter(|| black_box(reader.count(target, black_box(&paths))))
    });
}

criterion_group!(benches, benchmark_reader);
criterion_main!(benches);
