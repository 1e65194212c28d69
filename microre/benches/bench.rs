use criterion::{Criterion, black_box, criterion_group, criterion_main};
use microre::{RegExp, Regex, replace, split};

fn bench_basic_matching(c: &mut Criterion) {
    let pattern = Regex::new(r"hello\s+\w+");
    let input = "hello world this is a test hello universe";

    c.bench_function("basic_match", |b| {
        b.iter(|| black_box(pattern.find(black_box(input))))
    });
}

fn bench_greedy_backoff(c: &mut Criterion) {
    let pattern = Regex::new("a*ab");
    let input = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaab";

    c.bench_function("greedy_backoff", |b| {
        b.iter(|| black_box(pattern.find(black_box(input))))
    });
}

fn bench_alternation(c: &mut Criterion) {
    let pattern = Regex::new("(cat|dog|bird)s");
    let input = "the quick brown fox jumps over the lazy dogs";

    c.bench_function("alternation_match", |b| {
        b.iter(|| black_box(pattern.find(black_box(input))))
    });
}

fn bench_find_all(c: &mut Criterion) {
    let pattern = Regex::new(r"\d+");
    let input = "abc 123 def 456 ghi 789 jkl 012 mno 345 pqr 678 stu 901";

    c.bench_function("find_all_numbers", |b| {
        b.iter(|| black_box(pattern.find_all(black_box(input))))
    });
}

fn bench_character_classes(c: &mut Criterion) {
    let pattern = Regex::new(r"[a-zA-Z_][a-zA-Z0-9_]*");
    let input = "let x = 42; function_name(); var123 + y";

    c.bench_function("char_class_match", |b| {
        b.iter(|| black_box(pattern.find_all(black_box(input))))
    });
}

fn bench_replace(c: &mut Criterion) {
    let input = "2024-01-15, 2023-12-31, 2022-06-01";

    c.bench_function("replace_template", |b| {
        b.iter(|| {
            let mut re = RegExp::new(r"(\d+)-(\d+)-(\d+)", "g").unwrap();
            black_box(replace(black_box(input), &mut re, "$3/$2/$1"))
        })
    });
}

fn bench_split(c: &mut Criterion) {
    let re = RegExp::new(r"[,;]\s*", "").unwrap();
    let input = "alpha, beta;gamma,delta; epsilon,zeta";

    c.bench_function("split_separators", |b| {
        b.iter(|| black_box(split(black_box(input), &re)))
    });
}

criterion_group!(
    benches,
    bench_basic_matching,
    bench_greedy_backoff,
    bench_alternation,
    bench_find_all,
    bench_character_classes,
    bench_replace,
    bench_split,
);

criterion_main!(benches);
