use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use simplevm_core::vm::{PageTable, PAGE_SIZE};
use tempfile::TempDir;

fn bench_resident_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("resident_reads");

    for capacity in [4usize, 64, 512].iter() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = PageTable::new(temp_dir.path().join("swap.bytes"), *capacity).unwrap();
        for p in 0..*capacity as u32 {
            table.get_page(p * PAGE_SIZE as u32).unwrap();
        }

        group.throughput(Throughput::Elements(*capacity as u64));
        group.bench_with_input(BenchmarkId::from_parameter(capacity), capacity, |b, &capacity| {
            b.iter(|| {
                for p in 0..capacity as u32 {
                    black_box(table.read::<u64>(p * PAGE_SIZE as u32 + 64).unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_thrashing_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("thrashing_writes");

    for capacity in [1usize, 8, 32].iter() {
        let temp_dir = TempDir::new().unwrap();
        let mut table = PageTable::new(temp_dir.path().join("swap.bytes"), *capacity).unwrap();
        let span = (*capacity * 2) as u32;

        group.throughput(Throughput::Elements(span as u64));
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &span, |b, &span| {
            b.iter(|| {
                for p in 0..span {
                    table.write::<u32>(p * PAGE_SIZE as u32, p).unwrap();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resident_reads, bench_thrashing_writes);
criterion_main!(benches);
