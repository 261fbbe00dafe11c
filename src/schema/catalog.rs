//! The hammer firmware's configuration table

use super::{FieldDefinition, FieldValidation, SectionDefinition, SectionKind};

/// Toggle whose "on" state puts the device clock timestamp in the payload
pub const TIME_SYNC_KEY: &str = "SETTIME";

/// Select that parameterises the time-sync timestamp; never sent itself
pub const TIMEZONE_KEY: &str = "timezone";

/// Section holding both time fields
pub const TIMEZONE_SECTION_ID: &str = "date_time";

const TIMEZONES: &[(&str, &str)] = &[
    ("Local Time", "local"),
    ("UTC (London, Lisbon)", "UTC"),
    ("UTC+1 (Berlin, Paris, Rome)", "UTC+1"),
    ("UTC+2 (Helsinki, Cairo, Jerusalem)", "UTC+2"),
    ("UTC+3 (Moscow, Istanbul, Riyadh)", "UTC+3"),
    ("UTC+4 (Dubai, Baku)", "UTC+4"),
    ("UTC+5 (Karachi, Tashkent)", "UTC+5"),
    ("UTC+6 (Dhaka, Almaty)", "UTC+6"),
    ("UTC+7 (Bangkok, Jakarta)", "UTC+7"),
    ("UTC+8 (Singapore, Beijing, Manila)", "UTC+8"),
    ("UTC+9 (Tokyo, Seoul)", "UTC+9"),
    ("UTC+10 (Sydney, Brisbane)", "UTC+10"),
    ("UTC+11 (Solomon Islands)", "UTC+11"),
    ("UTC+12 (Auckland, Fiji)", "UTC+12"),
    ("UTC-1 (Azores)", "UTC-1"),
    ("UTC-2 (South Georgia)", "UTC-2"),
    ("UTC-3 (São Paulo, Buenos Aires)", "UTC-3"),
    ("UTC-4 (New York, Toronto)", "UTC-4"),
    ("UTC-5 (Chicago, Mexico City)", "UTC-5"),
    ("UTC-6 (Denver, Calgary)", "UTC-6"),
    ("UTC-7 (Los Angeles, Phoenix)", "UTC-7"),
    ("UTC-8 (Anchorage)", "UTC-8"),
    ("UTC-9 (Alaska)", "UTC-9"),
    ("UTC-10 (Hawaii)", "UTC-10"),
    ("UTC-11 (Midway Islands)", "UTC-11"),
    ("UTC-12 (Baker Island)", "UTC-12"),
];

/// Build the schema table in declaration order.
///
/// Order matters: the payload lists pairs in exactly this order and drops
/// whatever falls past the capacity.
pub fn hammer_schema() -> Vec<SectionDefinition> {
    vec![date_time(), basic(), alerts(), system()]
}

fn date_time() -> SectionDefinition {
    SectionDefinition::new(
        TIMEZONE_SECTION_ID,
        "Date and Time",
        SectionKind::Normal,
        vec![
            FieldDefinition::new(
                TIME_SYNC_KEY,
                "Time Synchronization",
                "Synchronize device time with local time",
                "",
                FieldValidation::toggle("Off", "On"),
            )
            .with_default("1"),
            FieldDefinition::new(
                TIMEZONE_KEY,
                "Timezone",
                "Select timezone for time synchronization",
                "",
                FieldValidation::select(TIMEZONES),
            )
            .with_default("local"),
        ],
    )
    .expanded()
}

fn basic() -> SectionDefinition {
    SectionDefinition::new(
        "basic",
        "Basic Settings",
        SectionKind::Normal,
        vec![
            FieldDefinition::new(
                "locale",
                "Language",
                "Interface language",
                "",
                FieldValidation::select(&[
                    ("English", "en"),
                    ("Suomi", "fi"),
                    ("日本語", "ja"),
                    ("简体中文", "zh-cn"),
                ]),
            ),
            FieldDefinition::new(
                "rotation",
                "Screen Rotation",
                "Set the display orientation",
                "",
                FieldValidation::select(&[("Normal", 1), ("Flipped", 3)]),
            ),
            FieldDefinition::new(
                "idle_shutdown_timeout",
                "Auto Shutdown",
                "Time in minutes before automatic shutdown when idle",
                "min",
                FieldValidation::integer(Some(1.0), Some(1440.0)),
            ),
            FieldDefinition::new(
                "remove_files_after_sync",
                "Auto Clean Files",
                "Automatically remove measurement files after successful sync",
                "",
                FieldValidation::tristate("Keep", "Remove"),
            ),
        ],
    )
}

fn alerts() -> SectionDefinition {
    let limit = |key: &str, label: &str, description: &str, unit: &str, max: f64| {
        FieldDefinition::new(
            key,
            label,
            description,
            unit,
            FieldValidation::float(Some(0.0), Some(max)),
        )
    };

    SectionDefinition::new(
        "alerts",
        "Alert Limits",
        SectionKind::AlertLimits,
        vec![
            limit("mean_g", "Mean", "Mean acceleration limits", "g", 20000.0),
            limit(
                "stdev_g",
                "Standard Deviation",
                "Standard deviation of acceleration",
                "g",
                20000.0,
            ),
            limit(
                "cv_prcnt",
                "CV",
                "Coefficient of variation percentage",
                "%",
                100.0,
            ),
            limit("min_g", "Minimum", "Minimum acceleration limits", "g", 20000.0),
            limit("max_g", "Maximum", "Maximum acceleration limits", "g", 20000.0),
            limit(
                "pp_g",
                "Peak-to-Peak",
                "Peak-to-peak acceleration limits",
                "g",
                20000.0,
            ),
        ],
    )
}

fn system() -> SectionDefinition {
    let float = |key: &str, label: &str, description: &str, unit: &str, min: f64, max: f64| {
        FieldDefinition::new(
            key,
            label,
            description,
            unit,
            FieldValidation::float(Some(min), Some(max)),
        )
        .advanced()
    };
    let switch = |key: &str, label: &str, description: &str| {
        FieldDefinition::new(
            key,
            label,
            description,
            "",
            FieldValidation::tristate("Off", "On"),
        )
        .advanced()
    };

    SectionDefinition::new(
        "system",
        "System Configuration",
        SectionKind::Normal,
        vec![
            float(
                "TARGET_ENERGY",
                "Target Energy",
                "Target energy level for the system",
                "J",
                0.0,
                50000.0,
            ),
            float(
                "SOLENOID_PULSE_LEN_US",
                "Solenoid Pulse Length",
                "Duration of the solenoid pulse",
                "µs",
                0.0,
                15000.0,
            ),
            switch(
                "PERSISTENT_PULSE_LEN_ENABLED",
                "Enable Persistent Pulse Length",
                "Adjusts pulse length automatically based on previous measurements. \
                 Solenoid pulse length will be ignored when this is enabled.",
            ),
            float(
                "MEAS_IN_PROGRESS_CHART_Y_LIMIT",
                "Live Chart Y-axis Limit",
                "Maximum value displayed on the live chart during measurement",
                "g",
                10.0,
                1000.0,
            ),
            switch(
                "DYNAMIC_SCALING",
                "Live Chart Dynamic Scaling",
                "Enable dynamic scaling of the live chart. Automatically adjusts maximum \
                 value displayed if y-axis limit is exceeded.",
            ),
            switch(
                "ENABLE_GAVG",
                "Enable Gaussian Averaging",
                "Enable gaussian averaging for measurement files",
            ),
            FieldDefinition::new(
                "HAMMER_FORCE_MODE",
                "Hammer Force Mode",
                "Adjusts hammer force in profile measurement",
                "",
                FieldValidation::select(&[("Standard", 0), ("Low", 1), ("High", 2)]),
            )
            .advanced(),
            float(
                "ADJUSTMENT_A",
                "Adjustment A",
                "Quadratic adjustment of measurement values",
                "",
                -1000.0,
                1000.0,
            ),
            float(
                "ADJUSTMENT_B",
                "Adjustment B",
                "Linear adjustment of measurement values",
                "",
                -1000.0,
                1000.0,
            ),
            float(
                "ADJUSTMENT_C",
                "Adjustment C",
                "Constant adjustment of measurement values",
                "",
                -1000.0,
                1000.0,
            ),
            FieldDefinition::new(
                "GFILTER_STD",
                "Gaussian Filter Standard Deviation",
                "Standard deviation for the gaussian filter",
                "",
                FieldValidation::float(None, None),
            )
            .advanced(),
            float(
                "INTERP_STEP_MM",
                "Interpolation Step",
                "Step size for interpolation",
                "mm",
                0.0,
                10.0,
            ),
            float(
                "DISTANCE_ENCODER_STEP_MM",
                "Distance Encoder Step",
                "Step size for distance encoder",
                "mm",
                0.0,
                10.0,
            ),
            float(
                "ADC_ACCEL_0G",
                "Accelerometer sensor value at 0g",
                "Sensor value at 0g (used for calibration)",
                "",
                0.0,
                4095.0,
            ),
            float(
                "ADC_ACCEL_STEP",
                "Accelerometer sensor value step",
                "Step size for accelerometer sensor value (steps per g)",
                "1/g",
                0.0,
                20.0,
            ),
            FieldDefinition::new(
                "PID_MODE",
                "Hammer speed control",
                "Hammer speed control mode",
                "",
                FieldValidation::select(&[("Off", 0), ("Continuous", 1)]),
            )
            .advanced(),
        ],
    )
}
