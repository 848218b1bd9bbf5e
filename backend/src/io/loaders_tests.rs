#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::io::loaders::{read_csv_bytes, Workbook, WorkbookLoader};
    use crate::parsing::cell_to_date;
    use polars::prelude::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const TICKETS_CSV: &str = "Date,Hour,Category\n2024-03-04,9,Network\n2024-03-04,10,Access\n2024-03-05,9,Network\n";

    /// Helper to create a temp CSV file
    fn create_temp_csv_file() -> NamedTempFile {
        let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(temp_file, "{}", TICKETS_CSV).unwrap();
        temp_file
    }

    #[test]
    fn test_read_csv_bytes() {
        let df = read_csv_bytes(TICKETS_CSV.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("Hour").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_load_from_csv_names_sheet_after_stem() {
        let file = create_temp_csv_file();
        let workbook = WorkbookLoader::load_from_path(file.path()).unwrap();

        let expected = file.path().file_stem().unwrap().to_str().unwrap();
        assert_eq!(workbook.sheet_names(), vec![expected]);
        assert_eq!(workbook.first_sheet().unwrap().frame.height(), 3);
    }

    #[test]
    fn test_load_from_dir_sorted_sheets() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b_team.csv"), TICKETS_CSV).unwrap();
        std::fs::write(dir.path().join("a_team.csv"), TICKETS_CSV).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let workbook = WorkbookLoader::load_from_path(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["a_team", "b_team"]);
    }

    #[test]
    fn test_load_from_empty_dir_fails() {
        let dir = tempdir().unwrap();
        assert!(WorkbookLoader::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_load_rejects_unsupported_extensions() {
        let file = NamedTempFile::with_suffix(".json").unwrap();
        let err = WorkbookLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));

        let xlsx = NamedTempFile::with_suffix(".xlsx").unwrap();
        let err = WorkbookLoader::load_from_path(xlsx.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open workbook"));
    }

    /// Two-sheet `.xlsx`: text dates with numeric hours, then a staff table.
    fn tickets_xlsx() -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();

        let tickets = workbook.add_worksheet();
        tickets.set_name("indira").unwrap();
        for (row, line) in TICKETS_CSV.lines().enumerate() {
            for (col, field) in line.split(',').enumerate() {
                match field.parse::<f64>() {
                    Ok(v) => tickets.write_number(row as u32, col as u16, v).unwrap(),
                    Err(_) => tickets.write_string(row as u32, col as u16, field).unwrap(),
                };
            }
        }

        let summary = workbook.add_worksheet();
        summary.set_name("summary").unwrap();
        summary.write_string(0, 0, "Processed Tickets").unwrap();
        summary.write_string(0, 1, "Work days").unwrap();
        summary.write_number(1, 0, 100.0).unwrap();
        summary.write_number(1, 1, 5.0).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_load_from_excel_bytes_keeps_sheet_order() {
        let workbook = WorkbookLoader::load_from_excel_bytes(tickets_xlsx()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["indira", "summary"]);

        let frame = &workbook.sheet("indira").unwrap().frame;
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.column("Date").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("Category").unwrap().dtype(), &DataType::String);
        assert!(matches!(
            frame.column("Hour").unwrap().dtype(),
            DataType::Int64 | DataType::Float64
        ));

        let summary = &workbook.sheet("summary").unwrap().frame;
        assert_eq!(summary.height(), 1);
        assert_eq!(summary.width(), 2);
    }

    #[test]
    fn test_load_from_path_reads_xlsx() {
        let mut file = NamedTempFile::with_suffix(".xlsx").unwrap();
        file.write_all(&tickets_xlsx()).unwrap();
        file.flush().unwrap();

        let workbook = WorkbookLoader::load_from_path(file.path()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["indira", "summary"]);
        assert_eq!(workbook.first_sheet().unwrap().name, "indira");
    }

    #[test]
    fn test_excel_date_cells_become_text_dates() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Date").unwrap();
        // Excel serial for 2024-01-01
        sheet.write_number_with_format(1, 0, 45292.0, &date_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let workbook = WorkbookLoader::load_from_excel_bytes(bytes).unwrap();
        let frame = &workbook.first_sheet().unwrap().frame;
        let date = frame.column("Date").unwrap().get(0).unwrap();
        assert_eq!(
            cell_to_date(&date).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_load_from_excel_bytes_rejects_garbage() {
        let err = WorkbookLoader::load_from_excel_bytes(b"Date,Hour\n".to_vec()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open workbook"));
    }

    #[test]
    fn test_load_from_csv_sheets() {
        let workbook = WorkbookLoader::load_from_csv_sheets(vec![
            ("indira", TICKETS_CSV),
            ("summary", "Processed Tickets,Work days\n100,5\n"),
        ])
        .unwrap();

        assert_eq!(workbook.sheet_names(), vec!["indira", "summary"]);
        assert_eq!(workbook.sheet("summary").unwrap().frame.height(), 1);
    }

    #[test]
    fn test_load_from_csv_sheets_requires_one_sheet() {
        let sheets: Vec<(String, String)> = Vec::new();
        assert!(WorkbookLoader::load_from_csv_sheets(sheets).is_err());
    }

    #[test]
    fn test_duplicate_sheet_names_rejected() {
        let df = df!("Date" => ["2024-01-01"]).unwrap();
        let err = Workbook::from_frames(vec![("a", df.clone()), ("a", df)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_unknown_sheet() {
        let df = df!("Date" => ["2024-01-01"]).unwrap();
        let workbook = Workbook::from_frames(vec![("tickets", df)]).unwrap();
        let err = workbook.sheet("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSheet);
    }
}
