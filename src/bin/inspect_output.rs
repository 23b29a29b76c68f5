use anyhow::{Context, Result, bail};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

const CONTRIBUTION_TOLERANCE: f64 = 0.02;

fn collect_parquet_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            collect_parquet_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "parquet") {
            files.push(path);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let Some(dir) = std::env::args().nth(1) else {
        bail!("usage: inspect_output <output-dir>");
    };

    println!("=== INSPECTING {} ===\n", dir);

    let mut files = Vec::new();
    collect_parquet_files(Path::new(&dir), &mut files)?;
    files.sort();
    if files.is_empty() {
        bail!("no parquet files under {}", dir);
    }

    let mut combined: Option<DataFrame> = None;
    for file in &files {
        let df = ParquetReader::new(File::open(file)?)
            .finish()
            .with_context(|| format!("Failed to read {}", file.display()))?;
        println!("📄 {}: {} rows", file.display(), df.height());
        combined = Some(match combined {
            Some(mut acc) => {
                acc.vstack_mut(&df)?;
                acc
            }
            None => df,
        });
    }
    let Some(df) = combined else {
        bail!("no rows read");
    };

    println!("\n📊 {} rows, columns: {:?}", df.height(), df.get_column_names_str());
    println!("{}", df.head(Some(5)));

    let sums = df
        .clone()
        .lazy()
        .group_by([col("Outlet_Identifier")])
        .agg([
            col("Revenue_Contribution_Percent").sum().alias("contribution_sum"),
            len().alias("groups"),
        ])
        .sort(["Outlet_Identifier"], SortMultipleOptions::default())
        .collect()?;

    let outlets = sums.column("Outlet_Identifier")?.str()?;
    let totals = sums.column("contribution_sum")?.f64()?;
    let mut off = 0;
    for (outlet, total) in outlets.into_iter().zip(totals.into_iter()) {
        let (Some(outlet), Some(total)) = (outlet, total) else {
            continue;
        };
        if (total - 100.0).abs() > CONTRIBUTION_TOLERANCE {
            println!("⚠️ {} contribution sums to {:.2}", outlet, total);
            off += 1;
        }
    }

    println!(
        "\n✅ {} outlets checked, {} outside ±{} of 100%",
        sums.height(),
        off,
        CONTRIBUTION_TOLERANCE
    );

    Ok(())
}
