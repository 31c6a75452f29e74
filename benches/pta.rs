use automata_pta::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn reference() -> MealyMachine<char, u8> {
    let mut mm = MealyMachine::new(Void);
    let states: Vec<_> = (1..6u8)
        .map(|i| mm.add_state(vec!['a'; i as usize], Void))
        .collect();
    let mut current = 0;
    for (i, &next) in states.iter().enumerate() {
        mm.add_transition(current, 'a', next, i as u8 % 2);
        mm.add_transition(current, 'b', 0, 2);
        current = next;
    }
    mm.add_transition(current, 'a', current, 1);
    mm.add_transition(current, 'b', states[0], 0);
    mm
}

fn pta_benchmark(c: &mut Criterion) {
    let mm = reference();
    let traces = TraceSampler::new(1337).samples(&mm, &['a', 'b'], 2_000);

    c.bench_function("build", |b| {
        b.iter(|| PrefixTree::<MealySemantics<char, u8>>::build(black_box(&traces)).unwrap())
    });

    let pta = PrefixTree::<MealySemantics<char, u8>>::build(&traces).unwrap();
    c.bench_function("clone", |b| b.iter(|| black_box(&pta).clone()));
    c.bench_function("extract", |b| {
        b.iter(|| black_box(&pta).extract_sequences().count())
    });
    c.bench_function("consistency", |b| {
        b.iter(|| black_box(&pta).is_consistent_with_all(&traces))
    });
    c.bench_function("materialize", |b| {
        b.iter(|| black_box(&pta).to_automaton().unwrap().size())
    });
}

criterion_group!(benches, pta_benchmark);
criterion_main!(benches);
