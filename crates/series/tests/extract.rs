use eurochart_series::{
    available_years, extract, extract_categories, extract_year, CategoryLayout, CohortTable,
    ExtractOptions, HeaderLocator, NameCorrections, YearRange, EU27,
};
use eurochart_sheet::{Book, CellValue, Sheet};
use rust_xlsxwriter::Workbook;

fn row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

// ===== Header Scan =====

#[test]
fn test_testland_flagged_cell() {
    let sheet = Sheet::from_rows(
        "access",
        vec![
            vec!["Country".into(), 2020.into(), 2021.into()],
            row(&["Testland", "45.2", "u"]),
        ],
    );

    let extraction = extract(&sheet, &ExtractOptions::new());

    assert_eq!(extraction.years, vec![2020, 2021]);
    assert_eq!(extraction.series.len(), 1);
    let testland = extraction.series.get("Testland").unwrap();
    assert_eq!(testland.len(), 1);
    assert_eq!(testland[&2020], 45.2);
}

#[test]
fn test_missing_header_is_empty() {
    let sheet = Sheet::from_data(vec![vec!["Notes"], vec!["Belgium"]]);
    let extraction = extract(&sheet, &ExtractOptions::new());
    assert!(extraction.is_empty());

    let empty = extract(&Sheet::new(), &ExtractOptions::new());
    assert!(empty.years.is_empty());
    assert!(empty.series.is_empty());

    let options = ExtractOptions::new().with_header(HeaderLocator::Containing("TIME".into()));
    assert!(extract(&sheet, &options).is_empty());
    assert!(available_years(&sheet, &options).is_empty());
}

#[test]
fn test_years_out_of_range_never_appear() {
    let sheet = Sheet::from_data(vec![
        row(&["GEO", "2012", "2013", "2024", "2025"]),
        row(&["Malta", "1", "2", "3", "4"]),
    ]);
    let extraction = extract(&sheet, &ExtractOptions::new());

    assert_eq!(extraction.years, vec![2013, 2024]);
    let years: Vec<i32> = extraction.series.years().into_iter().collect();
    assert_eq!(years, vec![2013, 2024]);
}

// ===== Row Scan =====

#[test]
fn test_value_present_iff_numeric() {
    let cells = [
        ("88.5", Some(88.5)),
        ("90 b", Some(90.0)),
        (":", None),
        (": u", None),
        ("", None),
        ("n/a", None),
        ("NaN", None),
        ("inf", None),
    ];
    let mut data = vec![row(&["GEO", "2024"])];
    for (index, (text, _)) in cells.iter().enumerate() {
        data.push(row(&[&format!("Country {index}"), text]));
    }
    data.push(vec!["Numberland".into(), CellValue::Float(f64::NAN)]);
    let sheet = Sheet::from_rows("flags", data);

    let series = extract(&sheet, &ExtractOptions::new().keep_empty_entities(true)).series;

    for (index, (text, expected)) in cells.iter().enumerate() {
        assert_eq!(
            series.value(&format!("Country {index}"), 2024),
            *expected,
            "cell {text:?}"
        );
    }
    assert_eq!(series.value("Numberland", 2024), None);
}

#[test]
fn test_entities_without_values_are_dropped() {
    let sheet = Sheet::from_data(vec![
        row(&["GEO", "2023", "2024"]),
        row(&["Albania", ":", ":"]),
        row(&["Austria", "90", ""]),
    ]);

    let series = extract(&sheet, &ExtractOptions::new()).series;
    assert_eq!(series.entities().collect::<Vec<_>>(), vec!["Austria"]);

    let kept = extract(&sheet, &ExtractOptions::new().keep_empty_entities(true)).series;
    assert!(kept.get("Albania").unwrap().is_empty());
}

#[test]
fn test_exclusions_and_corrections() {
    let sheet = Sheet::from_data(vec![
        row(&["GEO", "2024"]),
        row(&["European Union", "91"]),
        row(&["Euro area - 20 countries (from 2023)", "92"]),
        row(&["  Czech Republic ", "93"]),
        row(&["Turkey", "80"]),
        row(&["Belgium", "94"]),
    ]);
    let options = ExtractOptions::new()
        .exclude("European Union")
        .exclude_prefix("euro area")
        .with_corrections(NameCorrections::eurostat());

    let series = extract(&sheet, &options).series;

    assert!(!series.contains("European Union"));
    assert_eq!(
        series.entities().collect::<Vec<_>>(),
        vec!["Belgium", "Czechia", "Türkiye"]
    );
    assert_eq!(series.value("Czechia", 2024), Some(93.0));
}

#[test]
fn test_exclusion_applies_to_corrected_name() {
    let sheet = Sheet::from_data(vec![row(&["GEO", "2024"]), row(&["Turkey", "80"])]);
    let options = ExtractOptions::new()
        .exclude("Türkiye")
        .with_corrections(NameCorrections::eurostat());
    assert!(extract(&sheet, &options).series.is_empty());
}

#[test]
fn test_duplicate_entity_keeps_later_row() {
    let sheet = Sheet::from_data(vec![
        row(&["GEO", "2023", "2024"]),
        row(&["Malta", "70", "71"]),
        row(&["Malta", "", "75"]),
    ]);

    let extraction = extract(&sheet, &ExtractOptions::new());

    assert_eq!(extraction.duplicates, vec!["Malta"]);
    assert_eq!(extraction.series.value("Malta", 2023), None);
    assert_eq!(extraction.series.value("Malta", 2024), Some(75.0));
}

#[test]
fn test_extraction_is_idempotent() {
    let sheet = Sheet::from_data(vec![
        row(&["GEO", "2022", "2023"]),
        row(&["Czech Republic", "80", "82"]),
        row(&["Spain", "85", ":"]),
    ]);
    let options = ExtractOptions::new().with_corrections(NameCorrections::eurostat());

    let first = extract(&sheet, &options);
    let second = extract(&first.to_sheet(), &options);
    assert_eq!(first, second);
}

// ===== Target Year =====

#[test]
fn test_extract_year() {
    let sheet = Sheet::from_data(vec![
        row(&["GEO", "2023", "2024"]),
        row(&["Austria", "5.1", "4.8"]),
        row(&["Bulgaria", "15", ":"]),
    ]);

    let year = extract_year(&sheet, 2024, &ExtractOptions::new());
    assert_eq!(year.len(), 1);
    assert_eq!(year["Austria"], 4.8);

    assert!(extract_year(&sheet, 2020, &ExtractOptions::new()).is_empty());
}

#[test]
fn test_custom_year_range() {
    let sheet = Sheet::from_data(vec![row(&["GEO", "2019", "2020"]), row(&["Austria", "1", "2"])]);
    let options = ExtractOptions::new().with_years(YearRange::new(2015, 2019).unwrap());
    assert_eq!(available_years(&sheet, &options), vec![2019]);
}

// ===== Workbooks =====

fn write_cohort_sheet(workbook: &mut Workbook, name: &str, description: &str, values: [f64; 2]) {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name).unwrap();
    worksheet.write_string(0, 0, "Individuals - internet use").unwrap();
    worksheet.write_string(6, 0, "Individual type").unwrap();
    worksheet.write_string(6, 2, description).unwrap();
    worksheet.write_string(8, 0, "TIME").unwrap();
    worksheet.write_number(8, 1, 2023.0).unwrap();
    worksheet.write_number(8, 2, 2024.0).unwrap();
    worksheet.write_string(9, 0, "GEO (Labels)").unwrap();
    worksheet.write_string(10, 0, EU27).unwrap();
    worksheet.write_number(10, 1, values[0]).unwrap();
    worksheet.write_number(10, 2, values[1]).unwrap();
    worksheet.write_string(11, 0, "Belgium").unwrap();
    worksheet.write_number(11, 1, values[0] + 1.0).unwrap();
    worksheet.write_string(11, 2, ":").unwrap();
    worksheet.write_string(13, 0, "Special value").unwrap();
}

#[test]
fn test_cohorts_from_xlsx() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().write_string(0, 0, "Summary").unwrap();
    write_cohort_sheet(&mut workbook, "Sheet 1", "Males 16 to 24 years old", [95.0, 96.0]);
    write_cohort_sheet(&mut workbook, "Sheet 2", "Females 65 to 74 years old", [60.0, 64.0]);
    let book = Book::from_bytes("internet_population.xlsx", workbook.save_to_buffer().unwrap())
        .unwrap();

    let table = CohortTable::from_book(&book, &eurochart_series::cohort_options(YearRange::default()));

    assert_eq!(table.entities(), vec![EU27, "Belgium"]);
    assert_eq!(table.years(), vec![2023, 2024]);
    assert_eq!(table.years_with_data("Belgium"), vec![2023]);

    let eu = table.cohorts(EU27, 2024);
    assert_eq!(eu.len(), 2);
    assert_eq!(eu[1].age_group(), "65-74");
    assert_eq!(eu[1].value, 64.0);
}

#[test]
fn test_categories_from_rows() {
    let sheet = Sheet::from_data(vec![
        row(&["Internet activities 2024"]),
        row(&["GEO", "Age", "Internet use: Internet banking", "", "Internet use: sending/receiving e-mails", ""]),
        row(&["Belgium", "16 to 24 years", "70", "", "88", ""]),
        row(&["Belgium", "25 to 34 years", "89", "", "u", ""]),
    ]);

    let table = extract_categories(
        &sheet,
        "belgium",
        &CategoryLayout::default(),
        &NameCorrections::activity_labels(),
    );

    assert_eq!(table.categories, vec!["Internet Banking", "e-mail"]);
    assert_eq!(table.groups[1].values, vec![89.0, 0.0]);
}
