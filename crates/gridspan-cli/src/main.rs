//! Gridspan CLI - edit grid snapshot files from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gridspan::prelude::*;
use gridspan::{parse_dimension, Bound};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridspan")]
#[command(author, version, about = "Grid snapshot editing tool")]
struct Cli {
    /// Editor configuration (JSON with feature flags and dimensions)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new grid file
    Create {
        /// Output snapshot file
        file: PathBuf,

        /// Row count (default: from config, else 10)
        #[arg(short, long)]
        rows: Option<String>,

        /// Column count (default: from config, else 10)
        #[arg(short, long)]
        columns: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show dimensions, counts and merged ranges
    Info {
        /// Snapshot file
        file: PathBuf,
    },

    /// Print the grid as text
    Render {
        /// Snapshot file
        file: PathBuf,
    },

    /// Merge the rectangle between two cells
    Merge {
        file: PathBuf,
        /// First corner (R1C1 or 1,1)
        from: CellId,
        /// Opposite corner
        to: CellId,
    },

    /// Dissolve the merged range containing a cell
    Unmerge { file: PathBuf, cell: CellId },

    /// Blank a cell or the rectangle between two cells
    Blank {
        file: PathBuf,
        from: CellId,
        to: Option<CellId>,
    },

    /// Unblank a cell or the rectangle between two cells
    Unblank {
        file: PathBuf,
        from: CellId,
        to: Option<CellId>,
    },

    /// Set a cell's sequence number
    Set {
        file: PathBuf,
        cell: CellId,
        value: String,
    },

    /// Toggle a cell's blocked flag
    Block { file: PathBuf, cell: CellId },

    /// Autofill from a source cell towards a target cell
    Fill {
        file: PathBuf,
        source: CellId,
        to: CellId,
    },

    /// Append rows
    AddRow {
        file: PathBuf,
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Append columns
    AddColumn {
        file: PathBuf,
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Create {
            file,
            rows,
            columns,
            force,
        } => create(&file, config, rows.as_deref(), columns.as_deref(), force),
        Commands::Info { file } => show_info(&file, config),
        Commands::Render { file } => {
            let editor = open(&file, config)?;
            print!("{}", render_grid(editor.grid()));
            Ok(())
        }
        Commands::Merge { file, from, to } => merge(&file, config, from, to),
        Commands::Unmerge { file, cell } => unmerge(&file, config, cell),
        Commands::Blank { file, from, to } => set_blank(&file, config, from, to, true),
        Commands::Unblank { file, from, to } => set_blank(&file, config, from, to, false),
        Commands::Set { file, cell, value } => set_value(&file, config, cell, &value),
        Commands::Block { file, cell } => toggle_block(&file, config, cell),
        Commands::Fill { file, source, to } => fill(&file, config, source, to),
        Commands::AddRow { file, count } => add_lines(&file, config, count, Editor::add_row),
        Commands::AddColumn { file, count } => {
            add_lines(&file, config, count, Editor::add_column)
        }
    }
}

/// Read the editor configuration
///
/// The checkbox defaults to off for embedded editors, but an explicit
/// `block` command is its own request, so the CLI turns it on unless the
/// configuration says otherwise.
fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config '{}'", path.display()))?
        }
        None => EditorConfig::default(),
    };
    if !config.enable_checkbox.is_available() {
        config.enable_checkbox = Bound::Value(true);
    }
    Ok(config)
}

/// Open an existing snapshot file
///
/// Unlike an embedded editor, the CLI refuses to replace a damaged file
/// with a fresh grid.
fn open(file: &Path, config: EditorConfig) -> Result<Editor<MemorySink>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    GridSnapshot::from_json(&text)
        .and_then(|s| Grid::from_snapshot(&s))
        .with_context(|| format!("Failed to load '{}'", file.display()))?;
    Ok(Editor::load(config, Some(&text), MemorySink::new())?)
}

/// Write the latest committed change, if any
fn save(file: &Path, editor: &mut Editor<MemorySink>) -> Result<bool> {
    editor.flush();
    match editor.sink().last() {
        Some(change) => {
            std::fs::write(file, &change.snapshot_json)
                .with_context(|| format!("Failed to write '{}'", file.display()))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn create(
    file: &Path,
    mut config: EditorConfig,
    rows: Option<&str>,
    columns: Option<&str>,
    force: bool,
) -> Result<()> {
    if file.exists() && !force {
        bail!("'{}' already exists (use --force to overwrite)", file.display());
    }
    if let Some(rows) = rows {
        parse_dimension(rows).context("Invalid row count")?;
        config.row_count = Bound::Value(rows.into());
    }
    if let Some(columns) = columns {
        parse_dimension(columns).context("Invalid column count")?;
        config.column_count = Bound::Value(columns.into());
    }

    let mut editor = Editor::new(config, MemorySink::new())?;
    save(file, &mut editor)?;
    eprintln!(
        "Created {}x{} grid in '{}'",
        editor.grid().row_count(),
        editor.grid().column_count(),
        file.display()
    );
    Ok(())
}

fn show_info(file: &Path, config: EditorConfig) -> Result<()> {
    let editor = open(file, config)?;
    let grid = editor.grid();
    let stats = grid.stats();

    println!("File: {}", file.display());
    println!("Size: {} rows x {} columns", grid.row_count(), grid.column_count());
    println!("Visible cells: {}", stats.total_cells);
    println!("Blocked: {}", stats.blocked_cells);
    println!("Blank: {}", stats.blank_cells);
    println!("Merged ranges: {}", stats.merged_cells);

    for (merge_id, span) in grid.spans().iter() {
        println!("  {}  {}  ({}x{})", merge_id, span.rect(), span.row_span, span.col_span);
    }
    Ok(())
}

fn merge(file: &Path, config: EditorConfig, from: CellId, to: CellId) -> Result<()> {
    let mut editor = open(file, config)?;
    select_rect(&mut editor, from, to);
    let rect = editor
        .merge()
        .with_context(|| format!("Cannot merge {}", from.to(to)))?;
    save(file, &mut editor)?;
    eprintln!("Merged {}", rect);
    Ok(())
}

fn unmerge(file: &Path, config: EditorConfig, cell: CellId) -> Result<()> {
    let mut editor = open(file, config)?;
    let merge_id = editor
        .grid()
        .cell_by_id(cell)
        .and_then(|c| c.merge_id())
        .map(str::to_string);
    // Hidden cells cannot be selected; act through the anchor
    let target = editor.grid().anchor_of(cell).unwrap_or(cell);
    editor.click(target, false);
    if editor.unmerge()? {
        save(file, &mut editor)?;
        eprintln!("Unmerged {}", merge_id.unwrap_or_default());
    } else {
        eprintln!("{} is not merged", cell);
    }
    Ok(())
}

fn set_blank(
    file: &Path,
    config: EditorConfig,
    from: CellId,
    to: Option<CellId>,
    blank: bool,
) -> Result<()> {
    let mut editor = open(file, config)?;
    select_rect(&mut editor, from, to.unwrap_or(from));
    let count = if blank {
        editor.blank()?
    } else {
        editor.unblank()?
    };
    save(file, &mut editor)?;
    eprintln!(
        "{} {} cell(s)",
        if blank { "Blanked" } else { "Unblanked" },
        count
    );
    Ok(())
}

fn set_value(file: &Path, config: EditorConfig, cell: CellId, value: &str) -> Result<()> {
    let mut editor = open(file, config)?;
    if !editor.set_cell_value(cell, value)? {
        bail!("{} is outside the grid", cell);
    }
    save(file, &mut editor)?;
    Ok(())
}

fn toggle_block(file: &Path, config: EditorConfig, cell: CellId) -> Result<()> {
    let mut editor = open(file, config)?;
    if !editor.toggle_blocked(cell)? {
        bail!("{} is outside the grid", cell);
    }
    let blocked = editor.grid().cell_by_id(cell).map_or(false, |c| c.blocked);
    save(file, &mut editor)?;
    eprintln!("{} is now {}", cell, if blocked { "blocked" } else { "unblocked" });
    Ok(())
}

fn fill(file: &Path, config: EditorConfig, source: CellId, to: CellId) -> Result<()> {
    let mut editor = open(file, config)?;
    if !editor.begin_fill(source) {
        bail!("{} does not hold an integer or cannot start a fill", source);
    }
    editor.update_fill(to);
    let filled = editor.end_fill();
    save(file, &mut editor)?;
    match (filled.first(), filled.last()) {
        (Some(first), Some(last)) => eprintln!(
            "Filled {} cell(s): {}={} .. {}={}",
            filled.len(),
            first.cell,
            first.value,
            last.cell,
            last.value
        ),
        _ => eprintln!("Nothing to fill"),
    }
    Ok(())
}

fn add_lines(
    file: &Path,
    config: EditorConfig,
    count: usize,
    add: fn(&mut Editor<MemorySink>) -> gridspan::Result<()>,
) -> Result<()> {
    let mut editor = open(file, config)?;
    for _ in 0..count {
        add(&mut editor)?;
    }
    save(file, &mut editor)?;
    eprintln!(
        "Grid is now {}x{}",
        editor.grid().row_count(),
        editor.grid().column_count()
    );
    Ok(())
}

/// Select the rectangle between two corners the way a pointer drag would
fn select_rect(editor: &mut Editor<MemorySink>, from: CellId, to: CellId) {
    editor.pointer_down(PointerTarget::Cell(from), false);
    editor.pointer_enter(to);
    editor.pointer_up();
}

/// Text view of a grid
///
/// Anchors of merged ranges show their span, hidden cells show `·`, blank
/// cells are empty and blocked cells are marked with `#`.
fn render_grid(grid: &Grid) -> String {
    let labels: Vec<Vec<String>> = grid
        .rows()
        .iter()
        .map(|row| row.cells().iter().map(|cell| cell_label(grid, cell)).collect())
        .collect();

    let width = labels
        .iter()
        .flatten()
        .map(|l| l.chars().count())
        .chain(std::iter::once(format!("C{}", grid.column_count()).len()))
        .max()
        .unwrap_or(1);
    let gutter = format!("R{}", grid.row_count()).len();

    let mut out = String::new();
    let _ = write!(out, "{:gutter$}", "");
    for col in 1..=grid.column_count() {
        let _ = write!(out, " | {:<width$}", format!("C{}", col));
    }
    out.push('\n');

    for (row, cells) in grid.rows().iter().zip(&labels) {
        let _ = write!(out, "{:<gutter$}", format!("R{}", row.index));
        for label in cells {
            let _ = write!(out, " | {:<width$}", label);
        }
        out.push('\n');
    }
    out
}

fn cell_label(grid: &Grid, cell: &Cell) -> String {
    if grid.spans().is_hidden(cell) {
        return "·".to_string();
    }

    let mut label = if cell.blank {
        String::new()
    } else {
        cell.sequence_number.clone()
    };
    if cell.blocked {
        label.push('#');
    }
    let (rows, cols) = grid.spans().span_of(cell);
    if rows > 1 || cols > 1 {
        let _ = write!(label, " [{}x{}]", rows, cols);
    }
    label
}
