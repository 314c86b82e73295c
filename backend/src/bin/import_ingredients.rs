//! Seed the ingredient catalogue from a `name,measurement_unit` CSV file.

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use foodgram_backend::domain::{IngredientImportService, NewIngredient, read_ingredient_csv};
use foodgram_backend::outbound::persistence::{
    DbPool, DieselIngredientImportRepository, PoolConfig,
};
use tokio::runtime::Builder;

const DATABASE_URL_VAR: &str = "FOODGRAM_DATABASE_URL";

/// `import-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-ingredients",
    about = "Add ingredients from a CSV file to the catalogue, skipping known pairs"
)]
struct Args {
    /// CSV file with `name,measurement_unit` rows and no header.
    #[arg(long, value_name = "path", default_value = "data/ingredients.csv")]
    file: PathBuf,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(run(args))
}

async fn run(args: Args) -> io::Result<()> {
    let ingredients = load_ingredients(&args.file)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_VAR).ok())?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = IngredientImportService::new(Arc::new(DieselIngredientImportRepository::new(
        pool,
    )));
    let summary = service
        .import(&ingredients)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    writeln!(
        io::stdout().lock(),
        "read {} ingredients from {}, added {}",
        summary.submitted,
        args.file.display(),
        summary.inserted
    )
}

fn load_ingredients(path: &Path) -> io::Result<Vec<NewIngredient>> {
    let file = File::open(path)
        .map_err(|error| io::Error::new(error.kind(), format!("open {}: {error}", path.display())))?;
    read_ingredient_csv(file).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: {error}", path.display()),
        )
    })
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    let (value, source) = match (explicit, from_env) {
        (Some(value), _) => (value, "--database-url"),
        (None, Some(value)) => (value, DATABASE_URL_VAR),
        (None, None) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("database URL missing: set --database-url or {DATABASE_URL_VAR}"),
            ));
        }
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{source} must not be empty"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument handling.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn file_defaults_to_the_bundled_catalogue() {
        let args = Args::try_parse_from(["import-ingredients"]).expect("defaults parse");

        assert_eq!(args.file, PathBuf::from("data/ingredients.csv"));
        assert_eq!(args.database_url, None);
    }

    #[rstest]
    fn file_and_database_url_are_read_from_flags() {
        let args = Args::try_parse_from([
            "import-ingredients",
            "--file",
            "/tmp/ingredients.csv",
            "--database-url",
            "postgres://localhost/foodgram",
        ])
        .expect("flags parse");

        assert_eq!(args.file, PathBuf::from("/tmp/ingredients.csv"));
        assert_eq!(
            args.database_url.as_deref(),
            Some("postgres://localhost/foodgram")
        );
    }

    #[rstest]
    #[case(Some("postgres://flag"), Some("postgres://env"), "postgres://flag")]
    #[case(None, Some("postgres://env"), "postgres://env")]
    fn explicit_database_url_wins_over_environment(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: &str,
    ) {
        let url = resolve_database_url(
            explicit.map(str::to_owned),
            from_env.map(str::to_owned),
        )
        .expect("url resolves");

        assert_eq!(url, expected);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(None, Some(""))]
    fn missing_or_blank_database_url_is_rejected(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
    ) {
        let error = resolve_database_url(
            explicit.map(str::to_owned),
            from_env.map(str::to_owned),
        )
        .expect_err("no usable url");

        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn missing_file_error_names_the_path() {
        let path = env::temp_dir().join(format!(
            "foodgram-missing-{}.csv",
            uuid::Uuid::new_v4()
        ));

        let error = load_ingredients(&path).expect_err("file is absent");

        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        assert!(error.to_string().contains(&path.display().to_string()));
    }

    #[rstest]
    fn malformed_rows_surface_as_invalid_data() {
        let path = env::temp_dir().join(format!(
            "foodgram-ingredients-{}.csv",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "eggs,pcs\nflour\n").expect("write fixture");

        let result = load_ingredients(&path);
        std::fs::remove_file(&path).expect("remove fixture");

        let error = result.expect_err("second row lacks a unit");
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert!(error.to_string().contains("line 2"));
    }
}
