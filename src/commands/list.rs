use crate::ListingContext;
use crate::cli::Cli;
use crate::config::FormatConfig;
use crate::layout::LineLayout;
use crate::meta::{DescriptionCache, MetadataSource};
use crate::output::render::{render_header, render_task_separator};
use crate::output::{self, RenderOptions, RenderedLine, Renderer, SummaryStats, Theme};
use crate::scanner::{
    AttributeAdapter, CollectOptions, EntryCollector, NativeAttributes, SortOrder, order_entries,
};
use crate::scm::{ProcessCommand, ScmStatusResolver, StatusCommand};
use crate::utils::pager::{KeySource, Pager, PagerBuilder, PagerConfig, PagerState};
use crate::utils::{PartitionInfo, terminal_dimensions};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};

/// Directories to list, each with the patterns selecting its entries.
pub type TaskPlan = BTreeMap<PathBuf, Vec<String>>;

/// How a listing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// Every task was listed.
    Completed,
    /// The user stopped the listing at the pager prompt.
    Interrupted,
    /// This many tasks failed; the others were listed.
    Failed(usize),
}

/// Display and filtering choices for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Entry order.
    pub sort: SortOrder,
    /// Visibility filters.
    pub collect: CollectOptions,
    /// Line rendering switches.
    pub render: RenderOptions,
}

impl ListOptions {
    /// Options from the effective format settings at a terminal width.
    #[must_use]
    pub const fn new(format: &FormatConfig, sort: SortOrder, cols: usize) -> Self {
        Self {
            sort,
            collect: CollectOptions {
                hide_hidden: format.hide_hidden,
                hide_system: format.hide_system,
            },
            render: RenderOptions {
                layout: LineLayout {
                    cols,
                    compact_sizes: format.compact_sizes,
                    elide_names: format.elide_long_names,
                },
                hide_links: format.hide_links,
                hide_metadata: format.hide_metadata,
            },
        }
    }
}

/// Groups command-line paths into per-directory tasks.
///
/// A directory is listed whole; anything else is split into its parent
/// directory and a file-name pattern. No paths lists the current directory.
#[must_use]
pub fn plan_tasks(paths: &[String]) -> TaskPlan {
    let mut tasks = TaskPlan::new();
    if paths.is_empty() {
        tasks.insert(PathBuf::from("."), vec!["*".to_string()]);
        return tasks;
    }

    for raw in paths {
        let path = Path::new(raw);
        let (directory, pattern) = if path.is_dir() {
            (path.to_path_buf(), "*".to_string())
        } else {
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let pattern = path
                .file_name()
                .map_or_else(|| "*".to_string(), |n| n.to_string_lossy().into_owned());
            (parent.to_path_buf(), pattern)
        };

        let patterns = tasks.entry(directory).or_default();
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    tasks
}

/// Lists directories with SCM status and descriptions through a pager.
pub struct Lister<'a, R = ProcessCommand, M = DescriptionCache, A = NativeAttributes> {
    /// SCM detection and status.
    resolver: ScmStatusResolver<R>,
    /// Directory enumeration.
    collector: EntryCollector<A>,
    /// Description lookups.
    metadata: M,
    /// Category colors.
    theme: &'a Theme,
    /// Display and filtering choices.
    options: ListOptions,
}

impl<'a> Lister<'a> {
    /// Lister over the real filesystem, VCS executables and `descript.ion`.
    #[must_use]
    pub fn new(theme: &'a Theme, options: ListOptions) -> Self {
        Self {
            resolver: ScmStatusResolver::new(),
            collector: EntryCollector::new(options.collect),
            metadata: DescriptionCache::new(),
            theme,
            options,
        }
    }
}

impl<'a, R: StatusCommand, M: MetadataSource> Lister<'a, R, M> {
    /// Lister with custom status command and metadata source.
    pub fn with_sources(runner: R, metadata: M, theme: &'a Theme, options: ListOptions) -> Self {
        Self {
            resolver: ScmStatusResolver::with_runner(runner),
            collector: EntryCollector::new(options.collect),
            metadata,
            theme,
            options,
        }
    }
}

impl<'a, R: StatusCommand, M: MetadataSource, A: AttributeAdapter> Lister<'a, R, M, A> {
    /// Replaces the attribute adapter used for enumeration.
    pub fn with_adapter<B: AttributeAdapter>(self, adapter: B) -> Lister<'a, R, M, B> {
        Lister {
            resolver: self.resolver,
            collector: EntryCollector::with_adapter(adapter, self.options.collect),
            metadata: self.metadata,
            theme: self.theme,
            options: self.options,
        }
    }

    /// Lists every task in key order.
    ///
    /// A failing task is reported on stderr and skipped; the byte total
    /// keeps running across the tasks that succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if output cannot be written or a key cannot be read.
    pub fn run<W: Write, K: KeySource>(
        &mut self,
        tasks: &TaskPlan,
        pager: &mut Pager<W, K>,
    ) -> Result<ListingOutcome> {
        let mut running_total = 0_u64;
        let mut failures = 0_usize;

        for (index, (directory, patterns)) in tasks.iter().enumerate() {
            if index > 0 {
                let separator = render_task_separator(self.options.render.layout.cols);
                if emit(pager, &separator)? == PagerState::Done {
                    return Ok(ListingOutcome::Interrupted);
                }
            }

            match self.list_task(directory, patterns, &mut running_total) {
                Ok(lines) => {
                    if emit(pager, &lines)? == PagerState::Done {
                        return Ok(ListingOutcome::Interrupted);
                    }
                }
                Err(e) => {
                    failures += 1;
                    pager.finish()?;
                    output::error(&format!("{e:#}"));
                }
            }
        }

        pager.finish()?;
        if failures > 0 {
            Ok(ListingOutcome::Failed(failures))
        } else {
            Ok(ListingOutcome::Completed)
        }
    }

    /// Renders every line of one task before any of it is shown.
    fn list_task(
        &mut self,
        directory: &Path,
        patterns: &[String],
        running_total: &mut u64,
    ) -> Result<Vec<RenderedLine>> {
        let span = span!(Level::DEBUG, "list_task", directory = %directory.display());
        let _guard = span.enter();

        let directory = std::path::absolute(directory)
            .with_context(|| format!("Failed to resolve {}", directory.display()))?;
        if !directory.is_dir() {
            anyhow::bail!("Not a directory: {}", directory.display());
        }

        let partition = match PartitionInfo::for_path(&directory) {
            Ok(partition) => Some(partition),
            Err(e) => {
                warn!(error = %e, "Partition figures unavailable");
                None
            }
        };
        let granularity = partition.map_or(0, |p| p.allocation_granularity);

        let collected = self
            .collector
            .collect(&directory, patterns, granularity)
            .with_context(|| format!("Failed to list {}", directory.display()))?;
        let scm = self.resolver.resolve(&directory);

        let renderer = Renderer::new(self.theme, self.options.render);
        let mut lines = vec![render_header(&directory, patterns), RenderedLine::blank()];

        for entry in order_entries(&collected, self.options.sort) {
            let description = if self.options.render.hide_metadata {
                None
            } else {
                self.metadata.lookup(entry.bare_name(), &directory)
            };
            lines.push(renderer.render_entry(entry, &scm, description.as_deref()));
        }

        if self.options.sort.is_grouped() {
            lines.extend(renderer.render_deleted(&scm));
        }
        lines.push(RenderedLine::blank());

        *running_total = running_total.saturating_add(collected.file_bytes);
        let stats = SummaryStats {
            files: collected.files.len(),
            dirs: collected.dirs.len(),
            total_bytes: *running_total,
            allocated_bytes: collected.allocated_bytes,
            slack_bytes: collected.slack_bytes(),
        };
        lines.extend(renderer.render_summary(&stats, partition.as_ref()));

        debug!(lines = lines.len(), manager = %scm.manager, "Task rendered");
        Ok(lines)
    }
}

/// Writes lines until the pager is interrupted.
fn emit<W: Write, K: KeySource>(
    pager: &mut Pager<W, K>,
    lines: &[RenderedLine],
) -> Result<PagerState> {
    for line in lines {
        if pager.write_line(&line.text)? == PagerState::Done {
            return Ok(PagerState::Done);
        }
    }
    Ok(pager.state())
}

/// Runs a listing for the parsed command line.
///
/// # Errors
///
/// Returns an error if output cannot be written or a key cannot be read.
pub fn execute(ctx: &ListingContext, cli: &Cli) -> Result<ListingOutcome> {
    let (rows, cols) = terminal_dimensions();
    let mut format = ctx.config.format;
    cli.apply_to(&mut format);

    let options = ListOptions::new(&format, cli.sort_order(&format), cols);
    let theme = Theme::from_config(&ctx.config.colors);
    let tasks = plan_tasks(&cli.paths);
    info!(tasks = tasks.len(), rows, cols, "Starting listing");

    let mut pager = PagerBuilder::new()
        .config(PagerConfig::from_context(ctx, rows))
        .build();
    Lister::new(&theme, options).run(&tasks, &mut pager)
}
