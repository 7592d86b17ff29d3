use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fy_parser::{classify, extract_blocks, validate};

fn transcript(blocks: usize) -> String {
    let mut text = String::new();
    for index in 0..blocks {
        text.push_str("Here is an updated version of the flow with the review step added.\n\n");
        text.push_str("```mermaid\nflowchart TD\n    A[Start] --> B{Review}\n    B -->|ok| C[Ship]\n    B -->|changes| A\n```\n");
        if index % 2 == 0 {
            text.push_str(&format!(
                "```text\nDiagram: Review loop {index} (flowchart)\nAdds an explicit review gate.\n```\n"
            ));
        }
        text.push_str("\nLet me know if you want the branches labelled differently.\n\n");
    }
    text
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_blocks");
    for blocks in [1_usize, 10, 100] {
        let text = transcript(blocks);
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &text, |b, text| {
            b.iter(|| extract_blocks(black_box(text)));
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let source = "journey\n    title Checkout\n    section Browse\n      See product: 5: User\n";
    c.bench_function("validate", |b| b.iter(|| validate(black_box(source))));
    c.bench_function("classify", |b| b.iter(|| classify(black_box(source))));
}

criterion_group!(benches, bench_extract, bench_validate);
criterion_main!(benches);
