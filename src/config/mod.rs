use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorConfig,
    /// Fixed filename the final book state is exported to.
    pub book_export_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub base_price: f64,
    /// Fractional band around the base price; 0.01 keeps prices within 1%.
    pub price_volatility: f64,
    pub min_quantity: u64,
    pub max_quantity: u64,
    /// Width of the synthetic timestamp window, in nanoseconds.
    pub window_ns: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            book_export_path: "book_state.csv".to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_price: 100.0,
            price_volatility: 0.01,
            min_quantity: 1,
            max_quantity: 1000,
            window_ns: 1_000_000_000,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let builder = config::Config::builder().add_source(config::File::with_name(path));
        Ok(builder.build()?.try_deserialize()?)
    }
}
