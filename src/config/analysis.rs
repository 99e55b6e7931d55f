//! Analysis and forecasting configuration

/// Swing (local extremum) detection
pub struct SwingSettings {
    // Neighbourhood half-width used when looking for peaks/troughs
    pub order: usize,
    // Wave analysis refuses to run below this many swing points
    pub min_swing_points: usize,
    // Number of most recent swings whose price deltas decide the trend
    pub trend_window: usize,
    // Number of most recent swings carried in the analysis output
    pub reported_swings: usize,
}

/// Fibonacci multipliers applied to the last wave size when projecting targets
pub struct TargetSettings {
    pub conservative_ratio: f64,
    pub moderate_ratio: f64,
    pub aggressive_ratio: f64,
}

/// Weights of the two confidence components
pub struct ConfidenceSettings {
    pub swing_count_weight: f64,
    pub volatility_weight: f64,
    // Swing count at which the count component saturates at 1.0
    pub saturation_swing_count: usize,
    // Swing prices looked at by the volatility component
    pub volatility_window: usize,
    // Volatility component used when fewer than 2 prices are available
    pub fallback_volatility_score: f64,
}

pub struct IndicatorSettings {
    pub momentum_window: usize,
    pub volatility_window: usize,
    pub short_ma_window: usize,
    pub long_ma_window: usize,
    // Trend strength reported when the series is shorter than `long_ma_window`
    pub neutral_trend_strength: f64,
}

pub struct ForecastSettings {
    pub default_horizons: [u32; 4],
    // Horizon (in business days) that receives the full target weight
    pub full_weight_horizon_days: u32,
    // Sanity bounds relative to the current price
    pub bullish_floor_ratio: f64,
    pub bearish_ceiling_ratio: f64,
}

pub struct BacktestSettings {
    pub days_back: usize,
    pub test_period: u32,
    // Sample every `step` days to bound the number of pipeline re-runs
    pub step: usize,
    // Extra history required on top of days_back + test_period
    pub warmup_margin: usize,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub swing: SwingSettings,
    pub targets: TargetSettings,
    pub confidence: ConfidenceSettings,
    pub indicators: IndicatorSettings,
    pub forecast: ForecastSettings,
    pub backtest: BacktestSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    swing: SwingSettings {
        order: 5,
        min_swing_points: 5,
        trend_window: 5,
        reported_swings: 10,
    },

    targets: TargetSettings {
        conservative_ratio: 0.618,
        moderate_ratio: 1.0,
        aggressive_ratio: 1.618,
    },

    confidence: ConfidenceSettings {
        swing_count_weight: 0.6,
        volatility_weight: 0.4,
        saturation_swing_count: 20,
        volatility_window: 5,
        fallback_volatility_score: 0.5,
    },

    indicators: IndicatorSettings {
        momentum_window: 14,
        volatility_window: 20,
        short_ma_window: 20,
        long_ma_window: 50,
        neutral_trend_strength: 0.5,
    },

    forecast: ForecastSettings {
        default_horizons: [1, 5, 10, 30],
        full_weight_horizon_days: 30,
        bullish_floor_ratio: 0.7,
        bearish_ceiling_ratio: 1.3,
    },

    backtest: BacktestSettings {
        days_back: 60,
        test_period: 5,
        step: 2,
        warmup_margin: 50,
    },
};
