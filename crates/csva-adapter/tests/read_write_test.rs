//! Integration tests for reading and writing records through CsvAdapter

use std::fs::File;
use std::io::{BufReader, Write};
use tempfile::NamedTempFile;

use csva_adapter::{CsvAdapter, CsvConfig, CsvError, ErrorKind, record};

const FAKEMAIL: &str = "john@example.com";
const OTHERFAKEMAIL: &str = "jane@example.com";

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Person {
        pub name: String => "name",
        pub age: i32 => "age",
        pub email: String => "email,omitempty",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    #[allow(non_snake_case)]
    pub struct PersonNoTags {
        pub Name: String => "",
        pub Age: i32,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct PersonWrongTag {
        pub name: String => "name,omitempty,foo",
        pub age: i32,
    }
}

fn person(name: &str, age: i32, email: &str) -> Person {
    Person {
        name: name.to_string(),
        age,
        email: email.to_string(),
    }
}

/// Helper to create a test file with CSV content
fn create_csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_header_from_tags() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    assert_eq!(adapter.schema().aliases(), vec!["name", "age", "email"]);
    assert!(adapter.fields()[2].omit_empty);
}

#[test]
fn test_header_without_tags_uses_field_names() {
    let adapter = CsvAdapter::<PersonNoTags>::new().unwrap();
    let output = adapter
        .write_to_string(&[PersonNoTags {
            Name: "John".to_string(),
            Age: 30,
        }])
        .unwrap();
    assert_eq!(output, "Name,Age\nJohn,30\n");
}

#[test]
fn test_wrong_tag_is_unsupported() {
    let err = CsvAdapter::<PersonWrongTag>::new().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedTag);
    assert!(err.to_string().contains("foo"));
}

#[test]
fn test_read_happy_path() -> anyhow::Result<()> {
    let data = format!("name,age,email\nJohn Doe,30,{FAKEMAIL}\nJane Smith,25,{OTHERFAKEMAIL}\n");
    let adapter = CsvAdapter::<Person>::new()?;

    let people = adapter.read_all(data.as_bytes())?;
    assert_eq!(
        people,
        vec![
            person("John Doe", 30, FAKEMAIL),
            person("Jane Smith", 25, OTHERFAKEMAIL),
        ]
    );
    Ok(())
}

#[test]
fn test_read_empty_file() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let err = adapter.read_from("".as_bytes()).err().unwrap();
    assert!(err.is_eof());
    assert_eq!(err.kind(), ErrorKind::ReadingLines);
}

#[test]
fn test_read_wrong_csv_yields_row_errors() {
    let data = "name,age,email\nJohn Doe,30\nJane Smith,25,jane@example.com,extra\n";
    let adapter = CsvAdapter::<Person>::new().unwrap();

    let results: Vec<_> = adapter.read_from(data.as_bytes()).unwrap().collect();
    assert_eq!(results.len(), 2);
    for result in &results {
        let err = result.as_ref().unwrap_err();
        assert!(err.is(ErrorKind::ReadingLines));
        assert!(err.is_unequal_lengths());
    }
}

#[test]
fn test_read_omit_empty() {
    let data = "name,age,email\nJohn Doe,30,\n";
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let people = adapter.read_all(data.as_bytes()).unwrap();
    assert_eq!(people, vec![person("John Doe", 30, "")]);
}

#[test]
fn test_read_unomitted_empty_value() {
    let data = "name,age,email\nJohn Doe,,john@example.com\nJane Smith,25,\n";
    let adapter = CsvAdapter::<Person>::new().unwrap();

    let mut records = adapter.read_from(data.as_bytes()).unwrap();
    let err = records.next().unwrap().unwrap_err();
    assert!(err.is(ErrorKind::EmptyValue));
    assert_eq!(err.line_number(), Some(1));
    assert!(err.to_string().contains("age"));

    // the row after a failed one is still delivered
    let jane = records.next().unwrap().unwrap();
    assert_eq!(jane, person("Jane Smith", 25, ""));
    assert!(records.next().is_none());
}

#[test]
fn test_read_missing_column() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let err = adapter
        .read_from("name\nJohn Doe\nJane Smith\n".as_bytes())
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    assert!(matches!(err, CsvError::FieldNotFound { ref alias } if alias == "age"));
}

#[test]
fn test_read_invalid_data() {
    let data = format!("name,age,email\nJohn Doe,thirty,{FAKEMAIL}\n");
    let adapter = CsvAdapter::<Person>::new().unwrap();

    let results: Vec<_> = adapter.read_from(data.as_bytes()).unwrap().collect();
    let err = results[0].as_ref().unwrap_err();
    assert!(err.is(ErrorKind::ParsingType));
    assert!(err.to_string().contains("thirty"));
}

#[test]
fn test_read_is_lazy_and_can_stop_early() {
    let data = "name,age\nJohn,30\nnot,a number\nJim,40\n";
    let adapter = CsvAdapter::<Person>::new().unwrap();

    let first: Vec<_> = adapter
        .read_from(data.as_bytes())
        .unwrap()
        .take(1)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first, vec![person("John", 30, "")]);
}

#[test]
fn test_read_all_stops_at_first_error() {
    let data = "name,age\nJohn,30\nJane,old\nJim,40\n";
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let err = adapter.read_all(data.as_bytes()).unwrap_err();
    assert_eq!(err.line_number(), Some(2));
}

#[test]
fn test_write_happy_path() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let people = vec![
        person("John Doe", 30, FAKEMAIL),
        person("Jane Smith", 25, OTHERFAKEMAIL),
    ];

    let mut output = Vec::new();
    adapter.write_to(&mut output, &people).unwrap();

    let expected = format!("name,age,email\nJohn Doe,30,{FAKEMAIL}\nJane Smith,25,{OTHERFAKEMAIL}\n");
    assert_eq!(String::from_utf8(output).unwrap(), expected);
}

#[test]
fn test_write_with_omit_empty() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let people = vec![person("John Doe", 30, ""), person("Jane Smith", 25, OTHERFAKEMAIL)];

    let output = adapter.write_to_string(&people).unwrap();
    assert_eq!(
        output,
        format!("name,age,email\nJohn Doe,30,\nJane Smith,25,{OTHERFAKEMAIL}\n")
    );
}

#[test]
fn test_write_empty_required_value() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let people = vec![person("John Doe", 30, FAKEMAIL), person("", 25, "")];

    let mut output = Vec::new();
    let err = adapter.write_to(&mut output, &people).unwrap_err();
    assert!(err.is(ErrorKind::EmptyValue));
    assert_eq!(err.line_number(), Some(2));

    // rows before the failing one were flushed
    assert_eq!(
        String::from_utf8(output).unwrap(),
        format!("name,age,email\nJohn Doe,30,{FAKEMAIL}\n")
    );
}

#[test]
fn test_write_empty_sequence() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    assert_eq!(
        adapter.write_to_string(Vec::<Person>::new()).unwrap(),
        "name,age,email\n"
    );

    let adapter = CsvAdapter::<Person>::with_config(CsvConfig::new().without_header()).unwrap();
    assert_eq!(adapter.write_to_string(Vec::<Person>::new()).unwrap(), "");
}

#[test]
fn test_write_from_lazy_sequence() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let people = (1..=3).map(|i| person(&format!("P{i}"), i * 10, ""));
    let output = adapter.write_to_string(people).unwrap();
    assert_eq!(output, "name,age,email\nP1,10,\nP2,20,\nP3,30,\n");
}

#[test]
fn test_file_round_trip() -> anyhow::Result<()> {
    let adapter = CsvAdapter::<Person>::with_config(
        CsvConfig::new().delimiter(';').use_crlf(true),
    )?;
    let people = vec![
        person("Doe; John", 30, FAKEMAIL),
        person("Jane \"JJ\" Smith", 25, ""),
    ];

    let output = NamedTempFile::new()?;
    adapter.write_to(output.reopen()?, &people)?;

    let reader = BufReader::new(File::open(output.path())?);
    let read_back = adapter.read_all(reader)?;
    assert_eq!(read_back, people);
    Ok(())
}

#[test]
fn test_read_from_file_with_comments() -> anyhow::Result<()> {
    let file = create_csv_file("# exported people\nname,age\n# first\nJohn,30\nJane,25\n");
    let adapter = CsvAdapter::<Person>::with_config(CsvConfig::new().comment('#'))?;

    let people = adapter.read_all(File::open(file.path())?)?;
    assert_eq!(people, vec![person("John", 30, ""), person("Jane", 25, "")]);
    Ok(())
}

#[test]
fn test_adapter_shared_across_threads() {
    let adapter = CsvAdapter::<Person>::new().unwrap();
    let data = "name,age\nJohn,30\n";

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let people = adapter.read_all(data.as_bytes()).unwrap();
                assert_eq!(people.len(), 1);
                let output = adapter.write_to_string(&people).unwrap();
                assert_eq!(output, "name,age,email\nJohn,30,\n");
            });
        }
    });
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct PersonWithImplicitAlias {
        pub name: String,
        pub age: i32 => "age",
        pub email: String => "email,omitempty",
    }
}

#[test]
fn test_no_implicit_alias() {
    let config = CsvConfig::new().no_implicit_alias(true);

    assert!(CsvAdapter::<PersonWithImplicitAlias>::new().is_ok());
    let err = CsvAdapter::<PersonWithImplicitAlias>::with_config(config.clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AliasNotFound);

    assert!(CsvAdapter::<Person>::with_config(config).is_ok());
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct PersonWithSkipField {
        pub name: String => "name",
        pub age: i32 => "alias=years",
        pub password: String => "-",
    }
}

#[test]
fn test_skip_and_explicit_alias() {
    let adapter = CsvAdapter::<PersonWithSkipField>::new().unwrap();
    assert_eq!(adapter.fields().len(), 2);
    assert_eq!(adapter.schema().aliases(), vec!["name", "years"]);

    let people = adapter
        .read_all("years,name,password\n41,Ann,secret\n".as_bytes())
        .unwrap();
    assert_eq!(people[0].age, 41);
    assert_eq!(people[0].password, "");
}
