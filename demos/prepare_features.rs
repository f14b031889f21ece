//! Feature preparation walkthrough
//!
//! Expands a small housing table with powers, pairwise products, log and exp
//! columns, standardizes it, prints the generated column names and persists
//! the fitted preparer.
//!
//! Run with: cargo run --example prepare_features
//! Set `RUST_LOG=feature_prep=debug` to see fit summaries.

use feature_prep::{
    backend::CpuBackend,
    preprocessing::{
        FeaturePreparer, FeaturePreparerConfig, FittedFeaturePreparer, FittedTransformer,
        Transformer,
    },
    Tensor2D,
};
use std::error::Error;

const COLUMNS: [&str; 4] = ["has_garage", "area", "rooms", "age"];

/// Features: [has_garage (0/1), living area in m², rooms, building age in years]
fn get_housing_data() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, 120.0, 4.0, 12.0],
        vec![0.0, 65.0, 2.0, 40.0],
        vec![1.0, 98.0, 3.0, 5.0],
        vec![0.0, 54.0, 2.0, 61.0],
        vec![1.0, 150.0, 5.0, 20.0],
        vec![0.0, 78.0, 3.0, 33.0],
        vec![1.0, 110.0, 4.0, 8.0],
        vec![0.0, 47.0, 1.0, 72.0],
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feature_prep=info".into()),
        )
        .init();

    let x = Tensor2D::<CpuBackend>::from_rows(&get_housing_data());

    let config = FeaturePreparerConfig::from_json_str(r#"{"powers": [1, 2, "log", "exp"]}"#)?;
    println!("Config: {}", config.to_json_string()?);

    let preparer = FeaturePreparer::<CpuBackend>::from_config(config);
    let fitted = preparer.fit(&x)?;

    println!("\nNon-boolean columns:");
    for (name, non_boolean) in COLUMNS.iter().zip(fitted.non_boolean_mask()) {
        println!("  {:<12} {}", name, non_boolean);
    }

    let names = fitted.expand_column_names(&COLUMNS)?;
    let prepared = fitted.transform(&x)?;
    let (rows, cols) = prepared.shape();
    println!("\nPrepared matrix: {} rows x {} columns", rows, cols);

    let values = prepared.ravel();
    for (c, name) in names.iter().enumerate() {
        let column: Vec<String> = (0..3)
            .map(|r| format!("{:>7.3}", values[r * cols + c]))
            .collect();
        println!("  {:<14} {}", name, column.join(" "));
    }

    // Persist and reload
    let path = std::env::temp_dir().join("housing_preparer.bin");
    fitted.save_to_file(&path)?;
    let loaded = FittedFeaturePreparer::<CpuBackend>::load_from_file(&path)?;
    println!("\nSaved fitted preparer to {}", path.display());

    let new_house = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 88.0, 3.0, 15.0]]);
    let prepared_new = loaded.transform(&new_house)?;
    println!("New house, first 4 prepared values: {:?}", &prepared_new.ravel()[..4]);

    let restored = loaded.inverse_transform(&prepared_new)?;
    println!("Recovered raw features: {:?}", restored.ravel());

    Ok(())
}
