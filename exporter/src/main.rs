use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hanrei_core::{ensure_unique_ids, Corpus, Record};
use rusqlite::{Connection, Row};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const EXPORT_SQL: &str = "SELECT
        id,
        jiken_shubetsu,
        kenri_shubetsu,
        jiken_shurui,
        hatsumei_meisho,
        jiken_bango,
        bumei,
        saiban_nengappi,
        hanketsu_kekka,
        genkoku,
        hikoku,
        soten,
        zenbun_url
    FROM hanrei_metadata
    ORDER BY saiban_nengappi DESC";

#[derive(Parser)]
#[command(name = "hanrei-exporter")]
#[command(about = "Export the case-law database and inspect the resulting corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export hanrei_metadata rows from SQLite to metadata.json
    Export {
        /// SQLite database path
        #[arg(long, default_value = "./data/hanrei.db")]
        db: String,
        /// Output JSON path
        #[arg(long, default_value = "./data/metadata.json")]
        output: String,
    },
    /// Load a metadata.json, build the index and report corpus statistics
    Stats {
        /// Input JSON path
        #[arg(long, default_value = "./data/metadata.json")]
        input: String,
        /// How many of the most widespread terms to list
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export { db, output } => {
            let n = export_metadata(Path::new(&db), Path::new(&output))?;
            println!("exported {n} records to {output}");
            Ok(())
        }
        Commands::Stats { input, top } => print_stats(&input, top),
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get("id")?,
        case_type: row.get("jiken_shubetsu")?,
        right_type: row.get("kenri_shubetsu")?,
        case_kind: row.get("jiken_shurui")?,
        title: row.get("hatsumei_meisho")?,
        case_number: row.get("jiken_bango")?,
        division: row.get("bumei")?,
        decision_date: row.get("saiban_nengappi")?,
        result: row.get("hanketsu_kekka")?,
        plaintiff: row.get("genkoku")?,
        defendant: row.get("hikoku")?,
        claim_point: row.get("soten")?,
        document_url: row.get("zenbun_url")?,
    })
}

fn read_records(db: &Path) -> Result<Vec<Record>> {
    let conn = Connection::open(db).with_context(|| format!("opening {}", db.display()))?;
    let mut stmt = conn.prepare(EXPORT_SQL)?;
    let rows = stmt.query_map([], row_to_record)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

fn export_metadata(db: &Path, output: &Path) -> Result<usize> {
    let records = read_records(db)?;
    // Refuse to write a file the search server would reject
    ensure_unique_ids(&records).context("exported rows do not form a valid corpus")?;

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut w = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(&mut w, &records)?;
    w.flush()?;

    let exported_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    tracing::info!(num_records = records.len(), output = %output.display(), %exported_at, "export complete");
    Ok(records.len())
}

fn print_stats(input: &str, top: usize) -> Result<()> {
    let corpus = Corpus::open(input, Default::default())?;
    let index = corpus.index();
    println!("documents:      {}", index.num_docs());
    println!("vocabulary:     {}", index.vocabulary_len());
    println!("avg doc length: {:.2}", index.avg_doc_len());

    let facets = corpus.facets();
    println!("right types:    {}", facets.right_types.join(", "));
    println!("case types:     {}", facets.case_types.join(", "));
    println!("results:        {}", facets.results.join(", "));

    println!("top terms by document frequency:");
    for (term, df) in index.top_terms(top) {
        let idf = index.idf(term).unwrap_or(0.0);
        println!("  {term:<24} df={df:<6} idf={idf:.4}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE hanrei_metadata (
                id INTEGER PRIMARY KEY,
                jiken_shubetsu TEXT, kenri_shubetsu TEXT, jiken_shurui TEXT,
                hatsumei_meisho TEXT, jiken_bango TEXT, bumei TEXT,
                saiban_nengappi TEXT, hanketsu_kekka TEXT, genkoku TEXT,
                hikoku TEXT, soten TEXT, zenbun_url TEXT
            );
            INSERT INTO hanrei_metadata VALUES
                (1, '審決取消訴訟', '特許', '行ケ', '半導体装置', '令和1年(行ケ)10001号', '第1部',
                 '令和2年1月1日', '請求棄却', 'A社', '特許庁長官', '進歩性', 'https://example.com/1.pdf'),
                (2, '侵害訴訟', '商標', NULL, NULL, '令和3年(ネ)10002号', '第2部',
                 '令和4年1月1日', '認容', 'B社', 'C社', NULL, NULL);",
        )
        .unwrap();
    }

    #[test]
    fn exports_rows_with_wire_field_names() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("hanrei.db");
        seed_db(&db);
        let out = dir.path().join("out").join("metadata.json");

        let n = export_metadata(&db, &out).unwrap();
        assert_eq!(n, 2);

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let arr = json.as_array().unwrap();
        // ORDER BY saiban_nengappi DESC
        assert_eq!(arr[0]["id"], 2);
        assert_eq!(arr[1]["pdf_url"], "https://example.com/1.pdf");
        assert_eq!(arr[1]["hatsumei_meisho"], "半導体装置");

        let corpus = Corpus::open(&out, Default::default()).unwrap();
        assert_eq!(corpus.get(2).unwrap().title, None);
    }

    #[test]
    fn duplicate_ids_are_not_written() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("dup.db");
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE hanrei_metadata (
                id INTEGER,
                jiken_shubetsu TEXT, kenri_shubetsu TEXT, jiken_shurui TEXT,
                hatsumei_meisho TEXT, jiken_bango TEXT, bumei TEXT,
                saiban_nengappi TEXT, hanketsu_kekka TEXT, genkoku TEXT,
                hikoku TEXT, soten TEXT, zenbun_url TEXT
            );
            INSERT INTO hanrei_metadata (id, hatsumei_meisho) VALUES (7, 'a'), (7, 'b');",
        )
        .unwrap();
        let out = dir.path().join("m.json");

        let err = export_metadata(&db, &out).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate case id 7"));
        assert!(!out.exists());
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("empty.db");
        Connection::open(&db).unwrap();
        assert!(export_metadata(&db, &dir.path().join("m.json")).is_err());
    }
}
