use recarg::{
    ArgumentParser, ConstructionError, FieldDescriptor, FieldKind, Group, ParsedValues, Record,
    RecordSchema,
};

#[test]
fn titled_group_gets_its_own_section() {
    #[derive(Debug, Record)]
    struct Opt {
        #[arg(group = "title")]
        x: i64,
    }

    let parser = ArgumentParser::<Opt>::new().unwrap();
    let help = parser.format_help();

    let section_at = help.find("title:").expect("group section missing");
    let member_at = help.find("--x").expect("member row missing");
    assert!(
        section_at < member_at,
        "member should render under its section:\n{help}"
    );

    // The grouped argument must not also show under Options.
    let options_at = help.find("Options:").expect("options section missing");
    assert!(options_at < section_at, "help:\n{help}");
    let options_block = &help[options_at..section_at];
    assert!(
        !options_block.contains("--x"),
        "grouped member leaked into Options:\n{help}"
    );
}

#[test]
fn group_description_renders_under_the_title() {
    #[derive(Debug, Record)]
    struct Opt {
        #[arg(group("title", "description"))]
        x: i64,
    }

    let help = ArgumentParser::<Opt>::new().unwrap().format_help();
    let title_at = help.find("title:").expect("section missing");
    let description_at = help.find("  description").expect("description missing");
    let member_at = help.find("--x").expect("member row missing");
    assert!(title_at < description_at && description_at < member_at, "help:\n{help}");
}

#[test]
fn same_title_merges_fields_into_one_section() {
    #[derive(Debug, Record)]
    struct Opt {
        #[arg(group = "Connection", default = "localhost")]
        host: String,
        #[arg(group = "Connection", default = 6379)]
        port: i64,
        #[arg(default = false)]
        quiet: bool,
    }

    let help = ArgumentParser::<Opt>::new().unwrap().format_help();
    assert_eq!(
        help.matches("Connection:").count(),
        1,
        "titled groups with the same title must merge:\n{help}"
    );
    let host_at = help.find("--host").expect("host row missing");
    let port_at = help.find("--port").expect("port row missing");
    assert!(host_at < port_at, "rows keep declaration order:\n{help}");
}

#[test]
fn first_description_wins_for_a_merged_title() {
    #[derive(Debug, Record)]
    struct Opt {
        #[arg(group("Tuning", "Knobs for the brave"), default = 1)]
        depth: i64,
        #[arg(group("Tuning", "Ignored second description"), default = 2)]
        width: i64,
    }

    let help = ArgumentParser::<Opt>::new().unwrap().format_help();
    assert!(help.contains("Knobs for the brave"), "help:\n{help}");
    assert!(!help.contains("Ignored second description"), "help:\n{help}");
}

struct Anon {
    first: i64,
    second: i64,
}

impl Record for Anon {
    fn schema() -> RecordSchema {
        RecordSchema::new("anon")
            .field(
                FieldDescriptor::new("first", FieldKind::Int)
                    .default(0)
                    .group(Group::anonymous_described("One block of arguments")),
            )
            .field(
                FieldDescriptor::new("second", FieldKind::Int)
                    .default(0)
                    .group(Group::anonymous_described("Another block of arguments")),
            )
    }

    fn from_values(values: &mut ParsedValues) -> Result<Self, ConstructionError> {
        Ok(Anon {
            first: values.take("first")?,
            second: values.take("second")?,
        })
    }
}

#[test]
fn anonymous_groups_never_merge() {
    let parser = ArgumentParser::<Anon>::new().unwrap();
    let help = parser.format_help();
    assert!(help.contains("One block of arguments"), "help:\n{help}");
    assert!(help.contains("Another block of arguments"), "help:\n{help}");

    let record = parser.try_parse_args(["--first", "1", "--second", "2"]).unwrap();
    assert_eq!(record.first, 1);
    assert_eq!(record.second, 2);
}

#[test]
fn grouped_and_ungrouped_fields_parse_the_same() {
    #[derive(Debug, Record)]
    struct Opt {
        #[arg(group = "Network", default = "localhost")]
        host: String,
        #[arg(default = 0)]
        retries: i64,
    }

    let parser = ArgumentParser::<Opt>::new().unwrap();
    let params = parser
        .try_parse_args(["--host", "example.com", "--retries", "3"])
        .unwrap();
    assert_eq!(params.host, "example.com");
    assert_eq!(params.retries, 3);
}
