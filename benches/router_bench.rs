//! Benchmarks for the Role Router
//!
//! Run with: cargo bench

use community_platform::router::*;
use community_platform::session::{FileSessionStore, MemorySessionStore, Role, Session};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tempfile::tempdir;

const USERNAMES: [&str; 4] = ["EditorJane", "musicbob", "alice", "MUSIC_EDITOR_99"];

const HREFS: [&str; 6] = [
    "/",
    "/login",
    "/community",
    "/profile",
    "/workspaces/42",
    "/editor/dashboard",
];

fn bench_derive_role(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_role");
    group.throughput(Throughput::Elements(USERNAMES.len() as u64));

    group.bench_function("mixed_usernames", |b| {
        b.iter(|| {
            for name in USERNAMES {
                black_box(derive_role(black_box(name)));
            }
        })
    });

    group.finish();
}

fn bench_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_navigation");
    group.throughput(Throughput::Elements(HREFS.len() as u64));

    let session = Session::new("EditorJane", Role::Editor);

    group.bench_function("logged_out", |b| {
        b.iter(|| {
            for href in HREFS {
                black_box(gate_navigation(black_box(href), None));
            }
        })
    });

    group.bench_function("logged_in", |b| {
        b.iter(|| {
            for href in HREFS {
                black_box(gate_navigation(black_box(href), Some(&session)));
            }
        })
    });

    group.finish();
}

fn bench_router(c: &mut Criterion) {
    let mut group = c.benchmark_group("router");

    group.bench_function("memory_navigate", |b| {
        let router = RoleRouter::new(MemorySessionStore::new());
        router.login("musicbob").unwrap();

        b.iter(|| router.navigate(black_box("/workspaces")).unwrap());
    });

    group.bench_function("file_login_logout", |b| {
        let dir = tempdir().unwrap();
        let router = RoleRouter::new(FileSessionStore::new(dir.path().join("session.json")));

        b.iter(|| {
            router.login(black_box("EditorJane")).unwrap();
            router.logout().unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_derive_role, bench_gate, bench_router);
criterion_main!(benches);
