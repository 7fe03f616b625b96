use std::io::Write;

use agroclim_dashboard::data::{from_reader, load_csv};
use agroclim_dashboard::error::{DataFormatError, LoadError};
use chrono::NaiveDate;
use speculate2::speculate;
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

speculate! {
    describe "load_csv" {
        it "loads every row of a valid file" {
            let file = write_csv(
                "Date,Temperature,Precipitation\n2020-01-15,5.0,2.0\n2020-02-15,7.0,1.0\n",
            );
            let table = load_csv(file.path()).expect("Failed to load");

            assert_eq!(table.len(), 2);
            assert_eq!(table.records()[0].date, date(2020, 1, 15));
            assert_eq!(table.records()[0].temperature, Some(5.0));
            assert_eq!(table.records()[1].precipitation, Some(1.0));
        }

        it "accepts a header-only file as an empty table" {
            let file = write_csv("Date,Temperature,Precipitation\n");
            let table = load_csv(file.path()).expect("Failed to load");
            assert!(table.is_empty());
        }

        it "tolerates gaps between dates" {
            let file = write_csv(
                "Date,Temperature,Precipitation\n2020-01-01,1,0\n2020-03-01,2,0\n2021-06-01,3,0\n",
            );
            let table = load_csv(file.path()).expect("Failed to load");
            assert_eq!(table.len(), 3);
            assert_eq!(table.years(), vec![2020, 2021]);
        }

        it "reports a missing file as FileNotFound" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("absent.csv");

            match load_csv(&path) {
                Err(LoadError::FileNotFound(p)) => assert_eq!(p, path),
                other => panic!("expected FileNotFound, got {other:?}"),
            }
        }

        it "reports a missing column as a format error" {
            let file = write_csv("Date,Temperature\n2020-01-01,1\n");

            match load_csv(file.path()) {
                Err(LoadError::DataFormat(DataFormatError::MissingColumn(column))) => {
                    assert_eq!(column, "Precipitation");
                }
                other => panic!("expected MissingColumn, got {other:?}"),
            }
        }

        it "requires exact column names" {
            let file = write_csv("date,temperature,precipitation\n2020-01-01,1,0\n");
            let err = load_csv(file.path()).unwrap_err();
            assert!(matches!(
                err,
                LoadError::DataFormat(DataFormatError::MissingColumn(_))
            ));
        }
    }

    describe "from_reader" {
        it "rejects duplicate dates with the line of the repeat" {
            let err = from_reader(
                "Date,Temperature,Precipitation\n2020-01-01,1,0\n2020-01-01,2,0\n".as_bytes(),
            )
            .unwrap_err();

            match err {
                DataFormatError::DuplicateDate { line, date: d } => {
                    assert_eq!(line, 3);
                    assert_eq!(d, date(2020, 1, 1));
                }
                other => panic!("expected DuplicateDate, got {other:?}"),
            }
        }

        it "reports file lines when blank lines precede the bad row" {
            let err = from_reader(
                "Date,Temperature,Precipitation\n2020-01-01,1,0\n\n2020-01-02,warm,0\n".as_bytes(),
            )
            .unwrap_err();
            assert!(matches!(err, DataFormatError::InvalidNumber { line: 4, .. }));
            assert!(err.to_string().starts_with("line 4:"));
        }

        it "reports file lines after a quoted field spanning two lines" {
            let err = from_reader(
                "Date,Temperature,Precipitation,Note\n\
                 2020-01-01,1,0,\"first\nsecond\"\n\
                 2020-01-01,2,0,x\n"
                    .as_bytes(),
            )
            .unwrap_err();
            assert!(matches!(err, DataFormatError::DuplicateDate { line: 4, .. }));
        }

        it "rejects unparseable dates" {
            let err = from_reader("Date,Temperature,Precipitation\n15/01/2020,1,0\n".as_bytes())
                .unwrap_err();
            assert!(matches!(err, DataFormatError::InvalidDate { line: 2, .. }));
            assert!(err.to_string().contains("15/01/2020"));
        }

        it "rejects rows with the wrong number of fields" {
            let err = from_reader("Date,Temperature,Precipitation\n2020-01-01,1\n".as_bytes())
                .unwrap_err();
            assert!(matches!(err, DataFormatError::Csv(_)));
        }

        it "keeps rows whose measurements are missing" {
            let table = from_reader(
                "Date,Temperature,Precipitation\n2020-01-01,,\n2020-01-02,3.5,\n".as_bytes(),
            )
            .expect("Failed to parse");

            assert_eq!(table.len(), 2);
            assert_eq!(table.records()[0].temperature, None);
            assert_eq!(table.records()[1].temperature, Some(3.5));
            assert_eq!(table.records()[1].precipitation, None);
        }
    }
}
