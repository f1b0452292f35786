use crate::{
    cli::args::{
        CleanArgs, ComplexityArgs, GenerateArgs, LabelArgs, LabelCommand, ManifestArgs,
        SearchTextArgs, SemanticArgs,
    },
    core::{
        cleaner::{CleanOptions, CorpusCleaner},
        generator::{resolve_archetypes, SyntheticGenerator},
        labeler::{ComplexityPass, LabelApplier, LabelPass, RunSummary, SemanticPass},
        manifest::{write_manifest, ManifestBuilder},
        search_text::label_stream,
        AssignmentIndex, AtlasConfig, CappedErrorReporter, ConfigLoader, ConfigValidator,
        CorpusWalker, NodeClassifier,
    },
    utils::{resolve_against, IdMinter},
    Result,
};
use anyhow::{anyhow, Context};
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Absolute workspace root: `--workspace` when given, otherwise the current directory.
pub fn workspace_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = env::current_dir().context("failed to determine current directory")?;
    Ok(match explicit {
        Some(path) => resolve_against(&cwd, path),
        None => cwd,
    })
}

fn load_config(workspace: &Path) -> Result<AtlasConfig> {
    let config = ConfigLoader::load_from_workspace(workspace)?;
    ConfigValidator::validate(&config)?;
    Ok(config)
}

fn elapsed(duration: Duration) -> humantime::FormattedDuration {
    humantime::format_duration(Duration::from_millis(duration.as_millis() as u64))
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("failed to open input {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create output {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub async fn label(workspace: &Path, args: LabelArgs) -> Result<()> {
    match args.command {
        LabelCommand::Complexity(complexity_args) => label_complexity(workspace, complexity_args),
        LabelCommand::Semantic(semantic_args) => label_semantic(workspace, semantic_args),
    }
}

fn label_complexity(workspace: &Path, args: ComplexityArgs) -> Result<()> {
    let config = load_config(workspace)?;
    let root = resolve_against(workspace, args.corpus.as_ref().unwrap_or(&config.corpus.root));
    let reporter = CappedErrorReporter::new(
        args.max_errors
            .unwrap_or(config.reporting.max_errors_displayed),
    );

    let walker = CorpusWalker::new(root, config.corpus.extension.clone());
    run_pass(walker, ComplexityPass, &reporter, &config)
}

fn label_semantic(workspace: &Path, args: SemanticArgs) -> Result<()> {
    let config = load_config(workspace)?;
    let root = resolve_against(workspace, args.corpus.as_ref().unwrap_or(&config.corpus.root));
    let clusters = resolve_against(
        workspace,
        args.clusters
            .as_ref()
            .unwrap_or(&config.labeling.clusters_file),
    );
    let case_insensitive = config.labeling.case_insensitive_lookup && !args.case_sensitive;
    let reporter = CappedErrorReporter::new(
        args.max_errors
            .unwrap_or(config.reporting.max_errors_displayed),
    );

    let index = AssignmentIndex::load(&clusters, case_insensitive)?;
    println!("Loaded {} cluster assignments", index.len());

    let walker = CorpusWalker::new(root, config.corpus.extension.clone());
    let pass = SemanticPass::new(&index, config.corpus.extension.clone());
    run_pass(walker, pass, &reporter, &config)
}

fn run_pass<P: LabelPass>(
    walker: CorpusWalker,
    pass: P,
    reporter: &CappedErrorReporter,
    config: &AtlasConfig,
) -> Result<()> {
    let applier = LabelApplier::new(walker, pass, reporter)
        .with_progress_interval(config.reporting.progress_interval);
    let stats = applier.run()?;
    println!();
    print!("{}", RunSummary::new(applier.pass(), &stats, reporter));
    Ok(())
}

pub async fn clean(workspace: &Path, args: CleanArgs) -> Result<()> {
    let config = load_config(workspace)?;
    let settings = &config.cleaner;
    let input = resolve_against(workspace, args.input.as_ref().unwrap_or(&settings.input));
    let output = resolve_against(workspace, args.output.as_ref().unwrap_or(&settings.output));

    let classifier = if settings.exclude_core_nodes || args.exclude_core_nodes {
        NodeClassifier::from_config(&config.derivation)
    } else {
        NodeClassifier::without_allowlist(config.derivation.namespace.clone())
    };
    let dedupe = settings.dedupe || args.dedupe;
    let options = CleanOptions {
        name_fallback_chars: settings.name_fallback_chars,
        source_tag: settings.source_tag.clone(),
        dedupe,
    };
    let reporter = CappedErrorReporter::new(config.reporting.max_errors_displayed);

    let reader = open_input(&input)?;
    let writer = create_output(&output)?;
    tracing::info!(input = %input.display(), output = %output.display(), "cleaning dataset");

    let mut cleaner = CorpusCleaner::new(classifier, options, IdMinter::from_entropy(), &reporter)
        .with_progress_interval(config.reporting.progress_interval);
    let stats = cleaner.clean(reader, writer)?;

    println!();
    println!("=== CLEANING COMPLETE ===");
    println!("Read:       {}", stats.read);
    println!("Written:    {}", stats.written);
    println!("Failed:     {}", stats.failed);
    if dedupe {
        println!("Duplicates: {}", stats.duplicates);
    }
    println!("Elapsed:    {}", elapsed(stats.elapsed));
    println!("Output:     {}", output.display());
    Ok(())
}

pub async fn generate(workspace: &Path, args: GenerateArgs) -> Result<()> {
    let config = load_config(workspace)?;
    let settings = &config.generator;
    let output = resolve_against(workspace, args.output.as_ref().unwrap_or(&settings.output));
    let max_documents = args.max_documents.unwrap_or(settings.max_documents);
    if max_documents == 0 {
        return Err(anyhow!("--max-documents must be greater than zero"));
    }

    let archetypes = resolve_archetypes(&settings.archetypes, &settings.catalog, &args.archetypes)?;
    let writer = create_output(&output)?;

    let mut generator = SyntheticGenerator::new(
        archetypes,
        max_documents,
        config.derivation.namespace.clone(),
        IdMinter::from_entropy(),
    )
    .with_progress_interval(config.reporting.progress_interval);
    let stats = generator.generate(writer)?;

    println!();
    println!("=== GENERATION COMPLETE ===");
    println!("Written:   {}", stats.written);
    for (archetype, count) in &stats.per_archetype {
        println!("  {}: {}", archetype, count);
    }
    if stats.capped {
        println!("Stopped at the {} document ceiling", max_documents);
    }
    println!("Elapsed:   {}", elapsed(stats.elapsed));
    println!("Output:    {}", output.display());
    Ok(())
}

pub async fn manifest(workspace: &Path, args: ManifestArgs) -> Result<()> {
    let config = load_config(workspace)?;
    let root = resolve_against(workspace, args.corpus.as_ref().unwrap_or(&config.corpus.root));
    let output = resolve_against(
        workspace,
        args.output.as_ref().unwrap_or(&config.manifest.output),
    );

    let mut builder = ManifestBuilder::new(
        root,
        config.corpus.extension.clone(),
        NodeClassifier::from_config(&config.derivation),
    )
    .with_categories(
        config.manifest.categories.clone(),
        config.manifest.default_description.clone(),
    );
    if let Some(base) = &config.manifest.relative_to {
        builder = builder.with_relative_to(resolve_against(workspace, base));
    }

    let started = Instant::now();
    let (manifest, stats) = builder.build().await?;
    write_manifest(&output, &manifest)?;

    println!("=== MANIFEST WRITTEN ===");
    println!("Workflows:  {}", manifest.total_workflows);
    println!("Categories: {}", manifest.category_count);
    if stats.decode_failures > 0 || stats.unreadable > 0 {
        println!(
            "Defaulted:  {} undecodable, {} unreadable",
            stats.decode_failures, stats.unreadable
        );
    }
    println!("Elapsed:    {}", elapsed(started.elapsed()));
    println!("Output:     {}", output.display());
    Ok(())
}

pub async fn search_text(workspace: &Path, args: SearchTextArgs) -> Result<()> {
    let config = load_config(workspace)?;
    let settings = &config.search_text;
    let input = resolve_against(workspace, args.input.as_ref().unwrap_or(&settings.input));
    let output = resolve_against(workspace, args.output.as_ref().unwrap_or(&settings.output));
    let reporter = CappedErrorReporter::new(config.reporting.max_errors_displayed);

    let reader = open_input(&input)?;
    let writer = create_output(&output)?;
    let stats = label_stream(
        reader,
        writer,
        &reporter,
        config.reporting.progress_interval,
    )?;

    println!();
    println!("=== SEARCH TEXT LABELS APPLIED ===");
    println!("Written:   {}", stats.written);
    println!("Failed:    {}", stats.failed);
    println!("Elapsed:   {}", elapsed(stats.elapsed));
    println!("Output:    {}", output.display());
    Ok(())
}
