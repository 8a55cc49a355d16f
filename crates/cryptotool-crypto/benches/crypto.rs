use cryptotool_crypto::{
    box_open, box_seal, derive_key_from_passphrase, generate_keypair, open, seal,
};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

#[divan::bench(args = [14, 65536, 1048576])]
fn bench_seal(bencher: divan::Bencher, size: usize) {
    let key = derive_key_from_passphrase("test");
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| seal(divan::black_box(&data), divan::black_box(&key)).unwrap());
}

#[divan::bench(args = [14, 65536, 1048576])]
fn bench_open(bencher: divan::Bencher, size: usize) {
    let key = derive_key_from_passphrase("test");
    let data = make_data(size);
    let sealed = seal(&data, &key).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| open(divan::black_box(&sealed), divan::black_box(&key)).unwrap());
}

#[divan::bench(args = [14, 65536, 1048576])]
fn bench_box_seal(bencher: divan::Bencher, size: usize) {
    let pair = generate_keypair().unwrap();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            box_seal(
                divan::black_box(&data),
                divan::black_box(&pair.public),
                divan::black_box(&pair.private),
            )
            .unwrap()
        });
}

#[divan::bench(args = [14, 65536, 1048576])]
fn bench_box_open(bencher: divan::Bencher, size: usize) {
    let pair = generate_keypair().unwrap();
    let data = make_data(size);
    let sealed = box_seal(&data, &pair.public, &pair.private).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            box_open(
                divan::black_box(&sealed),
                divan::black_box(&pair.public),
                divan::black_box(&pair.private),
            )
            .unwrap()
        });
}

fn main() {
    divan::main();
}
