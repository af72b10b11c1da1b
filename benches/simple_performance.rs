use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sms_catapult::{matches_event, CatapultClient, CatapultConfig};
use sms_core::*;
use sms_web_generic::WebhookProcessor;
use std::sync::Arc;

const CALLBACK: &str = "eventType=sms&direction=in&messageId=m-1\
    &messageUri=https%3A%2F%2Fapi.catapult.inetwork.com%2Fv1%2Fusers%2Fu%2Fmessages%2Fm-1\
    &from=%2B13233326955&to=%2B13865245000&text=Example&applicationId=a-1\
    &time=2012-11-14T16%3A13%3A06.076Z&state=received";

fn benchmark_request_matching(c: &mut Criterion) {
    let matching = InboundEvent::from_form(CALLBACK.as_bytes()).unwrap();
    let foreign = InboundEvent::from_form(b"From=%2B1&To=%2B2&Text=hi").unwrap();

    let mut group = c.benchmark_group("request_matching");
    group.bench_function("catapult_event", |b| {
        b.iter(|| black_box(matches_event(black_box(&matching))))
    });
    group.bench_function("foreign_event", |b| {
        b.iter(|| black_box(matches_event(black_box(&foreign))))
    });
    group.finish();
}

fn benchmark_webhook_processing(c: &mut Criterion) {
    let client = CatapultClient::new(CatapultConfig::new("u", "t", "s"));
    let processor = WebhookProcessor::new(InboundRegistry::new().with(Arc::new(client)));

    let text_sizes = vec![10, 160, 1600];
    let mut group = c.benchmark_group("webhook_processing");

    for size in text_sizes {
        let payload = CALLBACK.replace("text=Example", &format!("text={}", "x".repeat(size)));

        group.bench_with_input(
            BenchmarkId::new("process_detected", size),
            &size,
            |b, &_size| b.iter(|| black_box(processor.process_detected(vec![], payload.as_bytes()))),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_request_matching,
    benchmark_webhook_processing
);
criterion_main!(benches);
