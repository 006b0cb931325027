use std::sync::Arc;

use sigline_signer::config::{PrimitivesConfig, WorkersConfig};
use sigline_signer::{Config, Md5Crc32, combine, multi_hash, sign};

fn config(workers: usize) -> Config {
    Config {
        workers: WorkersConfig { count: workers },
        primitives: PrimitivesConfig::default(),
    }
}

#[divan::bench(args = [1, 16, 256])]
fn sign_values(bencher: divan::Bencher, n: i64) {
    let values: Vec<i64> = (0..n).collect();
    let config = config(4);
    bencher.bench(|| sign(&values, Arc::new(Md5Crc32), &config).unwrap());
}

#[divan::bench]
fn multi_hash_single_item() -> String {
    multi_hash(&Md5Crc32, divan::black_box("4108050209~502633748"))
}

#[divan::bench(args = [10, 1000])]
fn combine_parts(bencher: divan::Bencher, n: usize) {
    let parts: Vec<String> = (0..n).rev().map(|i| format!("{i:08}")).collect();
    bencher.bench(|| combine(parts.clone()));
}

fn main() {
    divan::main();
}
