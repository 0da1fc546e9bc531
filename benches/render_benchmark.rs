use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use site_helpers::{
    Exception, Link, MemoryTemplateProvider, PageData, PageRenderer, RequestContext, Template,
    User,
};

const HEADER: &str =
    "<nav>{{if .IsUserLoggedIn}}{{.DisplayName}}{{else}}<a href=\"/login\">Log in</a>{{end}}</nav>";
const PAGE: &str = "<title>{{.Title}}</title>{{range .StyleSrc}}<link href=\"{{.Path}}\">{{end}}<body>{{.Body}}</body>";

struct Session;

impl RequestContext for Session {
    fn is_user_logged_in(&self) -> bool {
        true
    }

    fn user_id(&self) -> u64 {
        1
    }

    fn get_user(&self, id: u64) -> Result<User, Exception> {
        Ok(User {
            id,
            display_name: "bench & co".to_string(),
        })
    }
}

fn page(links: usize) -> PageData {
    let styles = (0..links)
        .map(|i| Link::new(&format!("/static/style{}.css", i)))
        .collect();
    PageData::new("Benchmark", "<p>body</p>", styles, Vec::new())
}

fn template_parse_benchmark(c: &mut Criterion) {
    c.bench_function("template_parse", |b| {
        b.iter(|| {
            let _ = Template::parse("page", black_box(PAGE)).unwrap();
        });
    });
}

fn render_with_header_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_with_header");
    let provider = MemoryTemplateProvider::new()
        .with_template("header.template", HEADER)
        .with_template("page.template", PAGE);
    let renderer = PageRenderer::new(provider, "header.template");

    for links in [0, 10, 100].iter() {
        let data = page(*links);
        group.bench_with_input(BenchmarkId::from_parameter(links), &data, |b, data| {
            b.iter(|| {
                let _ = renderer
                    .render_with_header("page.template", black_box(data), &Session)
                    .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, template_parse_benchmark, render_with_header_benchmark);
criterion_main!(benches);
