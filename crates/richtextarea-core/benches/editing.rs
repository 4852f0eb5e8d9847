use std::time::{Duration, Instant};

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use richtextarea_core::offset::{snap, to_offset, to_point};
use richtextarea_core::{Command, CommandExecutor, CursorCommand, EditCommand};

fn busy_text(repeat: usize) -> String {
    let mut out = String::with_capacity(repeat * 48);
    for i in 0..repeat {
        out.push_str(&format!("{i:04} bold-ish words 🎉 across the line\n"));
    }
    out.pop();
    out
}

fn seeded_executor(repeat: usize) -> CommandExecutor {
    let mut executor = CommandExecutor::new();
    executor
        .execute(
            Command::Edit(EditCommand::SetContent {
                text: busy_text(repeat),
            }),
            Instant::now(),
        )
        .unwrap();
    executor
}

fn bench_offset_mapping(c: &mut Criterion) {
    let executor = seeded_executor(200);
    let doc = executor.doc().clone();
    let total = doc.total_width();

    c.bench_function("offset_mapping/round_trip_sweep", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            let mut offset = 0;
            while offset <= total {
                let point = to_point(&doc, black_box(offset));
                acc = acc.wrapping_add(to_offset(&doc, &point));
                offset += 7;
            }
            black_box(acc);
        })
    });

    c.bench_function("offset_mapping/snap_sweep", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for offset in (0..=total).step_by(3) {
                acc = acc.wrapping_add(snap(&doc, black_box(offset)));
            }
            black_box(acc);
        })
    });
}

fn bench_typing_storm(c: &mut Criterion) {
    c.bench_function("typing_storm/200_inserts", |b| {
        b.iter_batched(
            || (seeded_executor(50), Instant::now()),
            |(mut executor, t0)| {
                for i in 0..200u64 {
                    executor
                        .execute(
                            Command::Edit(EditCommand::InsertText {
                                text: "x".to_string(),
                            }),
                            t0 + Duration::from_millis(i),
                        )
                        .unwrap();
                }
                black_box(executor.doc().total_width());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_bold_toggle(c: &mut Criterion) {
    c.bench_function("bold_toggle/full_document", |b| {
        b.iter_batched(
            || {
                let mut executor = seeded_executor(100);
                let end = executor.doc().total_width();
                executor
                    .execute(
                        Command::Cursor(CursorCommand::SetSelection { start: 0, end }),
                        Instant::now(),
                    )
                    .unwrap();
                (executor, Instant::now())
            },
            |(mut executor, now)| {
                executor
                    .execute(Command::Edit(EditCommand::ToggleBold), now)
                    .unwrap();
                black_box(executor.doc().total_width());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_offset_mapping,
    bench_typing_storm,
    bench_bold_toggle
);
criterion_main!(benches);
