use serde::Serialize;

use crate::domain::product::Category;

#[derive(Debug, Serialize)]
pub struct SizeChart {
    pub heading: &'static str,
    pub headers: &'static [&'static str],
    pub rows: &'static [&'static [&'static str]],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeGuide {
    pub title: &'static str,
    pub charts: &'static [SizeChart],
}

#[derive(Debug, Serialize)]
pub struct MeasuringTip {
    pub part: &'static str,
    pub how: &'static str,
}

pub static MEASURING_TIPS: [MeasuringTip; 3] = [
    MeasuringTip {
        part: "Chest/Bust",
        how: "Measure around the fullest part of your chest",
    },
    MeasuringTip {
        part: "Waist",
        how: "Measure around your natural waistline",
    },
    MeasuringTip {
        part: "Hip",
        how: "Measure around the fullest part of your hips",
    },
];

pub static FIT_TIPS: [&str; 3] = [
    "If you're between sizes, we recommend sizing up for a more comfortable fit",
    "Sizes may vary slightly between different styles and brands",
    "For fitted items, consider your preferred fit (relaxed vs. slim)",
];

static MEN: SizeGuide = SizeGuide {
    title: "Men's Size Guide",
    charts: &[
        SizeChart {
            heading: "General Sizing",
            headers: &["Size", "Chest (cm)", "Waist (cm)", "Hip (cm)"],
            rows: &[
                &["XS", "86-91", "71-76", "86-91"],
                &["S", "91-96", "76-81", "91-96"],
                &["M", "96-101", "81-86", "96-101"],
                &["L", "101-106", "86-91", "101-106"],
                &["XL", "106-111", "91-96", "106-111"],
                &["XXL", "111-116", "96-101", "111-116"],
            ],
        },
        SizeChart {
            heading: "Pants & Trousers",
            headers: &["Size", "Waist (cm)", "Hip (cm)", "Inseam (cm)"],
            rows: &[
                &["28", "71-73", "89-91", "76"],
                &["30", "76-78", "94-96", "76"],
                &["32", "81-83", "99-101", "81"],
                &["34", "86-88", "104-106", "81"],
                &["36", "91-93", "109-111", "81"],
                &["38", "96-98", "114-116", "81"],
            ],
        },
    ],
};

static WOMEN: SizeGuide = SizeGuide {
    title: "Women's Size Guide",
    charts: &[
        SizeChart {
            heading: "General Sizing",
            headers: &["Size", "Bust (cm)", "Waist (cm)", "Hip (cm)"],
            rows: &[
                &["XS", "78-82", "60-64", "86-90"],
                &["S", "82-86", "64-68", "90-94"],
                &["M", "86-90", "68-72", "94-98"],
                &["L", "90-94", "72-76", "98-102"],
                &["XL", "94-98", "76-80", "102-106"],
                &["XXL", "98-102", "80-84", "106-110"],
            ],
        },
        SizeChart {
            heading: "International Size Conversion",
            headers: &["Size", "UK", "US", "EU"],
            rows: &[
                &["XS", "6", "2", "34"],
                &["S", "8", "4", "36"],
                &["M", "10", "6", "38"],
                &["L", "12", "8", "40"],
                &["XL", "14", "10", "42"],
                &["XXL", "16", "12", "44"],
            ],
        },
    ],
};

static KIDS: SizeGuide = SizeGuide {
    title: "Kids' Size Guide",
    charts: &[SizeChart {
        heading: "General Sizing",
        headers: &["Size", "Age", "Height (cm)", "Chest (cm)", "Waist (cm)"],
        rows: &[
            &["2-3Y", "2-3 yrs", "92-98", "52-54", "50-51"],
            &["3-4Y", "3-4 yrs", "98-104", "54-56", "51-52"],
            &["4-5Y", "4-5 yrs", "104-110", "56-58", "52-53"],
            &["5-6Y", "5-6 yrs", "110-116", "58-60", "53-54"],
            &["6-7Y", "6-7 yrs", "116-122", "60-62", "54-55"],
            &["7-8Y", "7-8 yrs", "122-128", "62-64", "55-56"],
            &["8-9Y", "8-9 yrs", "128-134", "64-66", "56-57"],
            &["9-10Y", "9-10 yrs", "134-140", "66-68", "57-58"],
        ],
    }],
};

pub fn size_guide(category: Category) -> &'static SizeGuide {
    match category {
        Category::Men => &MEN,
        Category::Women => &WOMEN,
        Category::Kids => &KIDS,
    }
}

/// Looks up a guide by category name; unknown names get the men's guide.
pub fn size_guide_for(category: &str) -> &'static SizeGuide {
    size_guide(category.parse().unwrap_or(Category::Men))
}
