#![allow(dead_code)]

use chrono::{Duration, NaiveDate};

/// Tickets per weekday, Monday first.
pub const WEEK: [usize; 7] = [10, 12, 11, 13, 12, 14, 13];

pub fn start_date() -> NaiveDate {
    // A Monday
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// One row per ticket with `Date`, `Hour` and `Category` columns,
/// `WEEK[d % 7]` tickets on day `d`.
pub fn weekly_tickets_csv(weeks: usize) -> String {
    let mut csv = String::from("Date,Hour,Category\n");
    for day in 0..weeks * 7 {
        let date = start_date() + Duration::days(day as i64);
        for ticket in 0..WEEK[day % 7] {
            let category = if ticket % 3 == 0 { "Network" } else { "Access" };
            csv.push_str(&format!("{},{},{}\n", date, 8 + ticket % 10, category));
        }
    }
    csv
}

/// Raw export whose first column holds ticket timestamps under an
/// unrecognised header.
pub fn raw_export_csv(days: usize) -> String {
    let mut csv = String::from("Logged At,Summary\n");
    for day in 0..days {
        let date = start_date() + Duration::days(day as i64);
        for ticket in 0..(3 + day % 4) {
            csv.push_str(&format!("{} {:02}:15:00,Ticket {}\n", date, 9 + ticket, ticket));
        }
    }
    csv
}

/// Per-employee figures with locations and average daily tickets.
pub fn staff_csv() -> String {
    [
        "Employee Name,Location,Avg. Tickets / day",
        "Ana,Houston,21.5",
        "Ana,Denver,18.5",
        "Raj,Bangalore,25",
        "Kasia,Warsaw,17",
        "Lee,Unknown City,9",
    ]
    .join("\n")
        + "\n"
}

/// Processed-ticket totals over work days, without dates.
pub fn ratio_csv() -> String {
    [
        "Employee Name,Processed Tickets,Work days",
        "Ana,420,20",
        "Raj,380,19",
        "Kasia,0,0",
        "Lee,510,21",
        "Omar,440,20",
    ]
    .join("\n")
        + "\n"
}

/// The same tickets as [`weekly_tickets_csv`] plus a `staff` sheet, as an
/// `.xlsx` file. Dates are text cells and hours are numeric cells.
pub fn weekly_tickets_xlsx(weeks: usize) -> Vec<u8> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();

    let tickets = workbook.add_worksheet();
    tickets.set_name("tickets").unwrap();
    for (col, header) in ["Date", "Hour", "Category"].iter().enumerate() {
        tickets.write_string(0, col as u16, *header).unwrap();
    }
    let mut row = 1u32;
    for day in 0..weeks * 7 {
        let date = (start_date() + Duration::days(day as i64)).to_string();
        for ticket in 0..WEEK[day % 7] {
            let category = if ticket % 3 == 0 { "Network" } else { "Access" };
            tickets.write_string(row, 0, &date).unwrap();
            tickets.write_number(row, 1, (8 + ticket % 10) as f64).unwrap();
            tickets.write_string(row, 2, category).unwrap();
            row += 1;
        }
    }

    let staff = workbook.add_worksheet();
    staff.set_name("staff").unwrap();
    for (r, line) in staff_csv().lines().enumerate() {
        for (c, field) in line.split(',').enumerate() {
            match field.parse::<f64>() {
                Ok(v) if r > 0 => staff.write_number(r as u32, c as u16, v).unwrap(),
                _ => staff.write_string(r as u32, c as u16, field).unwrap(),
            };
        }
    }

    workbook.save_to_buffer().unwrap()
}
