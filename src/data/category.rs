use serde::Serialize;

// ---------------------------------------------------------------------------
// Column rules
// ---------------------------------------------------------------------------

/// How a chart picks its series out of the table's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// These names, in this order, where present.
    Exact(&'static [&'static str]),
    /// Every column starting with the prefix, in table order.
    Prefix(&'static str),
    /// Prefix matches first, then the listed names.
    PrefixPlusExact {
        prefix: &'static str,
        names: &'static [&'static str],
    },
}

impl ColumnRule {
    pub fn matches(&self, column: &str) -> bool {
        match self {
            ColumnRule::Exact(names) => names.contains(&column),
            ColumnRule::Prefix(prefix) => column.starts_with(prefix),
            ColumnRule::PrefixPlusExact { prefix, names } => {
                column.starts_with(prefix) || names.contains(&column)
            }
        }
    }
}

/// Evaluate `rule` against the live column list. Only present columns are
/// returned, without duplicates; an empty result means "no chart".
pub fn select_columns(columns: &[String], rule: &ColumnRule) -> Vec<String> {
    let present = |name: &str| columns.iter().any(|c| c == name);
    let by_prefix = |prefix: &str| {
        columns
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect::<Vec<_>>()
    };

    let mut selected: Vec<String> = match rule {
        ColumnRule::Exact(names) => names
            .iter()
            .filter(|n| present(**n))
            .map(|n| n.to_string())
            .collect(),
        ColumnRule::Prefix(prefix) => by_prefix(*prefix),
        ColumnRule::PrefixPlusExact { prefix, names } => {
            let mut cols = by_prefix(*prefix);
            cols.extend(names.iter().filter(|n| present(**n)).map(|n| n.to_string()));
            cols
        }
    };

    let mut seen = std::collections::HashSet::new();
    selected.retain(|c: &String| seen.insert(c.clone()));
    selected
}

// ---------------------------------------------------------------------------
// Chart rules and categories
// ---------------------------------------------------------------------------

/// One chart slot inside a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRule {
    pub title: &'static str,
    /// Unit note shown on the y axis.
    pub y_label: &'static str,
    pub rule: ColumnRule,
}

/// The six fixed measurement groupings, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    WeightBodyComp,
    BloodPressure,
    Hormones,
    FullBloodCount,
    Lipids,
    VitaminsOther,
}

const WEIGHT_CHARTS: &[ChartRule] = &[
    ChartRule {
        title: "Weight (kg) over Time",
        y_label: "kg",
        rule: ColumnRule::Exact(&["Weight_kg"]),
    },
    ChartRule {
        title: "Body Fat % (Raw vs Corrected)",
        y_label: "%",
        rule: ColumnRule::Exact(&["RENPHO_BodyFat_pct", "RENPHO_BodyFat_pct_corrected"]),
    },
    ChartRule {
        title: "Lean Mass (st) over Time",
        y_label: "st",
        rule: ColumnRule::Exact(&["RENPHO_LeanMass_st"]),
    },
];

const BP_CHARTS: &[ChartRule] = &[
    ChartRule {
        title: "Blood Pressure (Sys/Dia)",
        y_label: "mmHg",
        rule: ColumnRule::Exact(&["BP_Systolic", "BP_Diastolic"]),
    },
    ChartRule {
        title: "Pulse (bpm)",
        y_label: "bpm",
        rule: ColumnRule::Exact(&["BP_Pulse"]),
    },
];

const HORMONE_CHARTS: &[ChartRule] = &[ChartRule {
    title: "Hormone Trends",
    y_label: "",
    rule: ColumnRule::Prefix("Hormone_"),
}];

const FBC_CHARTS: &[ChartRule] = &[ChartRule {
    title: "FBC Trends",
    y_label: "",
    rule: ColumnRule::Prefix("FBC_"),
}];

const LIPID_CHARTS: &[ChartRule] = &[ChartRule {
    title: "Lipid Trends",
    y_label: "mmol/L",
    rule: ColumnRule::Prefix("Lipid_"),
}];

const VITAMIN_CHARTS: &[ChartRule] = &[ChartRule {
    title: "Vitamins & Other Markers",
    y_label: "",
    rule: ColumnRule::PrefixPlusExact {
        prefix: "Vitamin_",
        names: &["PSA", "TSH"],
    },
}];

impl Category {
    pub const ALL: [Category; 6] = [
        Category::WeightBodyComp,
        Category::BloodPressure,
        Category::Hormones,
        Category::FullBloodCount,
        Category::Lipids,
        Category::VitaminsOther,
    ];

    /// Short label used on tabs.
    pub fn label(self) -> &'static str {
        match self {
            Category::WeightBodyComp => "Weight & Body Comp",
            Category::BloodPressure => "Blood Pressure",
            Category::Hormones => "Hormones",
            Category::FullBloodCount => "FBC",
            Category::Lipids => "Lipids",
            Category::VitaminsOther => "Vitamins & Others",
        }
    }

    /// Section heading.
    pub fn heading(self) -> &'static str {
        match self {
            Category::WeightBodyComp => "Weight & Body Composition",
            Category::BloodPressure => "Blood Pressure",
            Category::Hormones => "Hormones",
            Category::FullBloodCount => "Full Blood Count",
            Category::Lipids => "Lipids",
            Category::VitaminsOther => "Vitamins & Others",
        }
    }

    pub fn charts(self) -> &'static [ChartRule] {
        match self {
            Category::WeightBodyComp => WEIGHT_CHARTS,
            Category::BloodPressure => BP_CHARTS,
            Category::Hormones => HORMONE_CHARTS,
            Category::FullBloodCount => FBC_CHARTS,
            Category::Lipids => LIPID_CHARTS,
            Category::VitaminsOther => VITAMIN_CHARTS,
        }
    }

    /// Whether any chart of this category would pick `column`.
    pub fn claims(self, column: &str) -> bool {
        self.charts().iter().any(|c| c.rule.matches(column))
    }
}
