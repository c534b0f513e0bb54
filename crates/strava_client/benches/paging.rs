use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strava_client::paging::handle_paging;
use strava_client::{Paging, StravaError};
use tokio::runtime::Builder;

/// In-memory list of `total` records served page by page.
fn fetch(total: usize) -> impl FnMut(Paging) -> std::future::Ready<Result<Vec<u64>, StravaError>> {
    move |p: Paging| {
        let start = (p.page() as usize - 1) * p.page_size() as usize;
        let end = (start + p.page_size() as usize).min(total);
        std::future::ready(Ok((start.min(end) as u64..end as u64).collect()))
    }
}

fn bench_paging(c: &mut Criterion) {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    c.bench_function("fetch_all_10k", |b| {
        b.to_async(&rt).iter(|| async {
            let records = handle_paging(None, fetch(10_000)).await.expect("fetch all");
            black_box(records.len())
        })
    });

    c.bench_function("oversize_page_1000", |b| {
        b.to_async(&rt).iter(|| async {
            let paging = Paging::new(3, 1000).expect("paging");
            let records = handle_paging(Some(paging), fetch(10_000))
                .await
                .expect("oversize page");
            black_box(records.len())
        })
    });
}

criterion_group!(benches, bench_paging);
criterion_main!(benches);
