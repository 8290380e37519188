//! Performance benchmarks for graph compilation.
//!
//! Run with: cargo bench --bench compile_benchmark
//!
//! Graphs are layered and diamond-heavy: every module depends on several
//! modules of the next layer, so most sub-trees are reached many times and
//! deduplication dominates the traversal.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sbom_compiler::compiler::{ArtifactFile, CompileInputs, DocumentSettings, SbomCompiler};
use sbom_compiler::licenses::KnownLicenses;
use sbom_compiler::model::{
    ComponentId, DependencyGraph, DeveloperInfo, ManifestInfo, ProjectInfo, ResolvedComponent,
};
use std::hint::black_box;

const SHA1: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
const SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
const FAN_OUT: usize = 4;

fn module(layer: usize, i: usize) -> ComponentId {
    ComponentId::module(format!("org.bench.l{layer}"), format!("m{i}"), "1.0.0")
}

/// Generate `layers` layers of `width` modules under one project root.
///
/// Every tenth module is an aggregator without artifacts, so collapsing is
/// exercised as well.
fn generate_inputs(layers: usize, width: usize) -> CompileInputs {
    let root = ComponentId::project(":app");
    let mut nodes = Vec::with_capacity(layers * width + 1);
    nodes.push(
        (0..width).fold(ResolvedComponent::new(root), |node, i| {
            node.depends_on(module(0, i))
        }),
    );

    for layer in 0..layers {
        for i in 0..width {
            let mut node = ResolvedComponent::new(module(layer, i)).with_repository("MavenRepo");
            if layer + 1 < layers {
                for k in 0..FAN_OUT {
                    node = node.depends_on(module(layer + 1, (i * 7 + k * 13) % width));
                }
            }
            nodes.push(node);
        }
    }

    let mut inputs = CompileInputs::new(nodes.into_iter().collect::<DependencyGraph>());
    inputs
        .projects
        .insert(ProjectInfo::new("app", ":app").with_version("1.0.0"));
    inputs
        .repositories
        .insert_url("MavenRepo", "https://repo.maven.org/maven2")
        .expect("valid repository");

    for layer in 0..layers {
        for i in 0..width {
            if i % 10 == 9 {
                continue;
            }
            let id = module(layer, i);
            inputs.artifacts.insert(
                &id,
                ArtifactFile::new(format!("m{i}-1.0.0.jar")).with_digests(SHA1, SHA256),
            );
            let license_url = if i % 3 == 0 {
                "https://www.apache.org/licenses/LICENSE-2.0.txt".to_string()
            } else {
                format!("https://example.com/licenses/{}", i % 17)
            };
            inputs.manifests.insert(
                &id,
                ManifestInfo::new()
                    .with_license("License", Some(&license_url))
                    .with_developer(DeveloperInfo::named("Dev").with_organization("Bench Org")),
            );
        }
    }
    inputs
}

fn bench_compile(c: &mut Criterion) {
    let known = KnownLicenses::curated();
    let mut group = c.benchmark_group("compile");

    for (layers, width) in [(5, 20), (10, 100), (20, 250)] {
        let inputs = generate_inputs(layers, width);
        let roots = [ComponentId::project(":app")];
        group.bench_with_input(
            BenchmarkId::from_parameter(layers * width),
            &inputs,
            |b, inputs| {
                b.iter(|| {
                    let settings = DocumentSettings::new("bench", "https://example.com/spdx/bench");
                    let doc = SbomCompiler::new(settings, &known)
                        .compile(black_box(inputs), &roots)
                        .expect("benchmark graph compiles");
                    black_box(doc)
                });
            },
        );
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let known = KnownLicenses::curated();
    let inputs = generate_inputs(10, 100);
    let settings = DocumentSettings::new("bench", "https://example.com/spdx/bench");
    let doc = SbomCompiler::new(settings, &known)
        .compile(&inputs, &[ComponentId::project(":app")])
        .expect("benchmark graph compiles");

    c.bench_function("serialize_1000_components", |b| {
        b.iter(|| black_box(doc.to_json_pretty()));
    });
}

criterion_group!(benches, bench_compile, bench_serialize);
criterion_main!(benches);
