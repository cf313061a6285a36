use super::to_json;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use mock_synth::endpoint::run_project_with_progress;
use mock_synth::{MemoryStore, Project};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for the project command
#[derive(Serialize, JsonSchema)]
pub(crate) struct ProjectJsonOutput {
    project_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    output_dir: String,
    dry_run: bool,
    elapsed_secs: f64,
    endpoints: Vec<EndpointSummary>,
    skipped: Vec<String>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct EndpointSummary {
    id: String,
    path: String,
    seed: u64,
    requested_count: usize,
    scale_factor: usize,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

pub fn run(
    config: PathBuf,
    output: PathBuf,
    progress: bool,
    json: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    if !config.exists() {
        anyhow::bail!("project file does not exist: {}", config.display());
    }
    let project = Project::from_path(&config)?;

    if !json {
        eprintln!(
            "Generating project: {} ({} endpoints)",
            project.name.as_deref().unwrap_or(&config.display().to_string()),
            project.endpoints().len()
        );
    }

    let start_time = Instant::now();
    let mut store = MemoryStore::new();

    let runs = if progress && !json {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%) {msg}",
            )?
            .progress_chars("█▓▒░  ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let pb_clone = pb.clone();
        let runs = run_project_with_progress(&project, &mut store, move |endpoint, done, total| {
            if done == 1 {
                pb_clone.set_length(total);
                pb_clone.set_message(endpoint.to_string());
            }
            pb_clone.set_position(done);
        })?;
        pb.finish_with_message("done");
        runs
    } else {
        run_project_with_progress(&project, &mut store, |_, _, _| {})?
    };

    if !dry_run {
        std::fs::create_dir_all(&output)
            .with_context(|| format!("failed to create {}", output.display()))?;
    }

    let mut endpoints = Vec::with_capacity(runs.len());
    for run in &runs {
        let file = if dry_run {
            None
        } else {
            let path = output.join(format!("{}.json", run.endpoint_id));
            let rows: Vec<&Map<String, Value>> =
                run.batch.records.iter().map(|r| &r.fields).collect();
            std::fs::write(&path, to_json(&rows, true)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Some(path.display().to_string())
        };

        let path = project
            .endpoint(&run.endpoint_id)
            .map(|e| e.path.clone())
            .unwrap_or_default();
        endpoints.push(EndpointSummary {
            id: run.endpoint_id.clone(),
            path,
            seed: run.batch.seed,
            requested_count: run.batch.requested_count,
            scale_factor: run.batch.scale_factor,
            records: run.batch.len(),
            file,
        });
    }

    let skipped: Vec<String> = project
        .endpoints()
        .iter()
        .filter(|e| !e.should_generate())
        .map(|e| e.id.clone())
        .collect();
    let elapsed = start_time.elapsed();

    if json {
        let out = ProjectJsonOutput {
            project_file: config.display().to_string(),
            name: project.name.clone(),
            output_dir: output.display().to_string(),
            dry_run,
            elapsed_secs: elapsed.as_secs_f64(),
            endpoints,
            skipped,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        eprintln!();
        for e in &endpoints {
            eprintln!(
                "  {:<24} {:>7} records  (requested {} x {})  [seed: {}]",
                e.id, e.records, e.requested_count, e.scale_factor, e.seed
            );
        }
        for id in &skipped {
            eprintln!("  {:<24} skipped (mock generation disabled)", id);
        }
        eprintln!();
        if dry_run {
            eprintln!("Dry run: no files written ({:.3?})", elapsed);
        } else {
            eprintln!("Wrote {} files to {} ({:.3?})", endpoints.len(), output.display(), elapsed);
        }
    }

    Ok(())
}
