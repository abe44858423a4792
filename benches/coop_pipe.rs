use std::io::{Read, Write};
use std::thread::spawn;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use futures::executor::block_on;

use coop_pipe::CloseDirection;
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("write then read", |b| {
        let (mut writer, mut reader) = coop_pipe::pipe();

        b.iter(|| {
            writer.write_all(black_box(&[0, 0, 0, 0])).unwrap();
            let mut buf = [0; 4];
            reader.read_exact(&mut buf).unwrap();
            black_box(buf)
        });
    });
    c.bench_function("async write then read", |b| {
        let (writer, reader) = coop_pipe::pipe();

        b.iter(|| {
            block_on(async {
                writer.write_async(black_box(&[0, 0, 0, 0])).await.unwrap();
                let mut buf = [0; 4];
                reader.read_async(&mut buf).await.unwrap();
                black_box(buf)
            })
        });
    });
    c.bench_function("full buffer reads", |b| {
        let (mut writer, mut reader) = coop_pipe::pipe_with_capacity(4096).unwrap();

        b.iter_batched(
            || {
                writer.write_all(black_box(&[0; 4096])).unwrap();
                black_box([0; 4096])
            },
            |mut buf| assert_eq!(buf.len(), reader.read(&mut buf).unwrap()),
            BatchSize::SmallInput,
        );
    });
    c.bench_function("streaming between threads", |b| {
        b.iter_batched(
            || coop_pipe::pipe_with_capacity(1024).unwrap(),
            |(mut writer, mut reader)| {
                let handle = spawn(move || {
                    for _ in 0..64 {
                        writer.write_all(black_box(&[0; 256])).unwrap();
                    }
                    writer.close(CloseDirection::WRITE);
                });

                let mut buf = [0; 512];
                let mut total = 0;
                loop {
                    let n = reader.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    total += n;
                }
                handle.join().unwrap();
                assert_eq!(64 * 256, total)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
