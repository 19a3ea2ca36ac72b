use std::fs;

use junit_listener::{
    writer::junit::Config, Description, Failure, JUnit, Listener,
    ListenerExt as _, Log,
};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use regex::Regex;

const FILTERED_TRACE: &str = "\
java.lang.AssertionError: expected true
\tat org.junit.Assert.fail(Assert.java:88)
\tat org.junit.Assert.assertTrue(Assert.java:41)
\tat pkg.ATest.bad(ATest.java:12)
\tat java.lang.reflect.Method.invoke(Native Method)
\tat android.test.InstrumentationTestCase.runMethod(InstrumentationTestCase.java:214)
\t... 8 more
";

/// Element of a parsed report, in document order.
#[derive(Debug)]
struct Element {
    depth: usize,
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }

    fn attr_names(&self) -> Vec<&str> {
        self.attrs.iter().map(|(k, _)| k.as_str()).collect()
    }
}

fn element(tag: &BytesStart<'_>, depth: usize) -> Element {
    Element {
        depth,
        name: String::from_utf8(tag.name().as_ref().to_vec()).unwrap(),
        attrs: tag
            .attributes()
            .map(|a| {
                let a = a.unwrap();
                (
                    String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                    a.unescape_value().unwrap().into_owned(),
                )
            })
            .collect(),
        text: String::new(),
    }
}

fn parse(xml: &str) -> Vec<Element> {
    let mut reader = Reader::from_str(xml);
    let mut elements = Vec::new();
    let mut open = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(tag) => {
                elements.push(element(&tag, open.len()));
                open.push(elements.len() - 1);
            }
            Event::Empty(tag) => elements.push(element(&tag, open.len())),
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) => {
                if let Some(&i) = open.last() {
                    let elem: &mut Element = &mut elements[i];
                    elem.text.push_str(&text.unescape().unwrap());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    assert!(open.is_empty(), "unclosed elements in:\n{xml}");
    elements
}

fn named<'e>(elements: &'e [Element], name: &str) -> Vec<&'e Element> {
    elements.iter().filter(|e| e.name == name).collect()
}

#[test]
fn single_file_report_matches_expected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );

    let ok = Description::test("pkg.ATest", "ok");
    writer.test_started(&ok).unwrap();
    writer.test_finished(&ok);

    let bad = Description::test("pkg.ATest", "bad");
    writer.test_started(&bad).unwrap();
    writer.test_failure(
        &Failure::new(bad.clone(), "java.lang.AssertionError")
            .with_message("expected true")
            .with_trace(FILTERED_TRACE),
    );
    writer.test_finished(&bad);

    let crash = Description::test("pkg.BTest", "crash");
    writer.test_started(&crash).unwrap();
    writer.test_error(
        &Failure::new(crash.clone(), "java.lang.IllegalStateException")
            .with_message("boom")
            .with_trace(
                "java.lang.IllegalStateException: boom\n\
                 \tat pkg.BTest.crash(BTest.java:7)\n\
                 \tat java.lang.reflect.Method.invoke(Native Method)\n",
            ),
    );
    writer.test_finished(&crash);
    writer.close();

    let buffer = fs::read_to_string(tmp.path().join("report.xml")).unwrap();

    // Elapsed times vary between runs, and whitespace is irrelevant.
    let non_deterministic = Regex::new("time=\"[^\"]+\"|\\s*\n\\s*").unwrap();

    assert_eq!(
        non_deterministic.replace_all(&buffer, ""),
        non_deterministic.replace_all(
            &fs::read_to_string("tests/junit/correct.xml").unwrap(),
            "",
        ),
    );
    assert!(Regex::new(r#"time="\d+\.\d{3}""#).unwrap().is_match(&buffer));
}

#[test]
fn groups_test_cases_of_one_class_into_one_suite() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );

    for name in ["a", "b", "c", "d"] {
        let test = Description::test("pkg.ATest", name);
        writer.test_started(&test).unwrap();
        writer.test_finished(&test);
    }
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    let elements = parse(&xml);
    let suites = named(&elements, "testsuite");
    let cases = named(&elements, "testcase");

    assert_eq!(suites.len(), 1);
    assert_eq!(suites[0].attr("name"), Some("pkg.ATest"));
    assert_eq!(suites[0].depth, 1);
    assert_eq!(cases.len(), 4);
    for case in cases {
        assert_eq!(case.depth, 2);
        assert_eq!(case.attr_names(), ["classname", "name", "time"]);
        assert_eq!(case.attr("classname"), Some("pkg.ATest"));
    }
    assert!(named(&elements, "failure").is_empty());
}

#[test]
fn single_file_mode_puts_suites_side_by_side() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );

    for class in ["A", "B"] {
        let test = Description::test(class, "test");
        writer.test_started(&test).unwrap();
        writer.test_finished(&test);
    }
    writer.close();

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    let elements = parse(&xml);

    assert_eq!(elements[0].name, "testsuites");
    assert_eq!(named(&elements, "testsuites").len(), 1);
    let suites = named(&elements, "testsuite")
        .into_iter()
        .map(|s| (s.depth, s.attr("name").unwrap()))
        .collect::<Vec<_>>();
    assert_eq!(suites, [(1, "A"), (1, "B")]);
}

#[test]
fn multi_file_mode_writes_file_per_suite() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("junitReport");
    let mut writer = JUnit::new(
        Config::multi_file("TEST-__suite__.xml").with_report_dir(&dir),
    );

    for class in ["pkg.ATest", "pkg.BTest", "pkg.CTest"] {
        for name in ["first", "second"] {
            let test = Description::test(class, name);
            writer.test_started(&test).unwrap();
            writer.test_finished(&test);
        }
    }
    writer.close();

    assert_eq!(fs::read_dir(&dir).unwrap().count(), 3);
    for class in ["pkg.ATest", "pkg.BTest", "pkg.CTest"] {
        let xml =
            fs::read_to_string(dir.join(format!("TEST-{class}.xml"))).unwrap();
        assert!(xml.starts_with(
            "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>",
        ));
        let elements = parse(&xml);

        assert!(named(&elements, "testsuites").is_empty());
        assert_eq!(elements[0].name, "testsuite");
        assert_eq!(elements[0].depth, 0);
        assert_eq!(elements[0].attr("name"), Some(class));
        let cases = named(&elements, "testcase");
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.attr("classname") == Some(class)));
    }
}

#[test]
fn failure_without_message_gets_placeholder() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );
    let bad = Description::test("pkg.ATest", "bad");

    writer.test_started(&bad).unwrap();
    writer.test_failure(
        &Failure::new(bad.clone(), "java.lang.AssertionError")
            .with_trace("java.lang.AssertionError\n"),
    );
    writer.test_finished(&bad);
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    let elements = parse(&xml);
    let failures = named(&elements, "failure");

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].depth, 3);
    assert_eq!(failures[0].attr_names(), ["message", "type"]);
    assert_eq!(
        failures[0].attr("message"),
        Some("java.lang.AssertionError: <null>"),
    );
    assert_eq!(failures[0].attr("type"), Some("java.lang.AssertionError"));
    assert_eq!(named(&elements, "testcase")[0].attr("name"), Some("bad"));
}

#[test]
fn filters_noise_from_traces() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );
    let bad = Description::test("pkg.ATest", "bad");

    writer.test_started(&bad).unwrap();
    writer.test_failure(
        &Failure::new(bad.clone(), "java.lang.AssertionError")
            .with_trace(FILTERED_TRACE),
    );
    writer.test_finished(&bad);
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    let elements = parse(&xml);

    assert_eq!(
        named(&elements, "failure")[0].text,
        "java.lang.AssertionError: expected true\n\
         \tat pkg.ATest.bad(ATest.java:12)\n",
    );
}

#[test]
fn keeps_traces_intact_without_filtering() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml")
            .with_report_dir(tmp.path())
            .with_filter_traces(false),
    );
    let bad = Description::test("pkg.ATest", "bad");

    writer.test_started(&bad).unwrap();
    writer.test_error(
        &Failure::new(bad.clone(), "java.lang.AssertionError")
            .with_trace(FILTERED_TRACE),
    );
    writer.test_finished(&bad);
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();

    assert_eq!(named(&parse(&xml), "error")[0].text, FILTERED_TRACE);
}

#[test]
fn repeated_problems_become_siblings() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );
    let bad = Description::test("pkg.ATest", "bad");

    writer.test_started(&bad).unwrap();
    writer.test_failure(&Failure::new(bad.clone(), "first"));
    writer.test_error(&Failure::new(bad.clone(), "second"));
    writer.test_finished(&bad);
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    let elements = parse(&xml);
    let case = named(&elements, "testcase")[0];
    let problems = elements
        .iter()
        .filter(|e| e.depth == case.depth + 1)
        .map(|e| (e.name.as_str(), e.attr("type").unwrap()))
        .collect::<Vec<_>>();

    assert_eq!(problems, [("failure", "first"), ("error", "second")]);
    assert_eq!(xml.matches("time=").count(), 1);
}

#[test]
fn closes_everything_after_a_crash() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );
    let test = Description::test("pkg.ATest", "crashing");

    writer.test_started(&test).unwrap();
    writer.test_error(&Failure::new(test.clone(), "SIGSEGV"));
    writer.close();
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    let elements = parse(&xml);

    assert_eq!(named(&elements, "testcase").len(), 1);
    assert!(named(&elements, "testcase")[0].attr("time").is_some());
    assert_eq!(named(&elements, "error").len(), 1);
}

#[test]
fn close_without_events_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );

    writer.close();
    writer.close();

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn shuts_down_through_listener_interface() {
    let tmp = tempfile::tempdir().unwrap();
    let mut listener: Box<dyn Listener> = Box::new(
        JUnit::new(
            Config::multi_file("__suite__.xml").with_report_dir(tmp.path()),
        )
        .tee(Log::new()),
    );
    let test = Description::test("pkg.ATest", "ok");

    listener.test_started(&Description::suite("pkg.ATest")).unwrap();
    listener.test_started(&test).unwrap();
    listener.test_finished(&test);
    listener.shutdown();

    let xml = fs::read_to_string(tmp.path().join("pkg.ATest.xml")).unwrap();
    let elements = parse(&xml);
    assert_eq!(named(&elements, "testsuite").len(), 1);
    assert_eq!(named(&elements, "testcase").len(), 1);
}

#[test]
fn replaces_control_characters_forbidden_in_xml() {
    let tmp = tempfile::tempdir().unwrap();
    let mut writer = JUnit::new(
        Config::single_file("report.xml").with_report_dir(tmp.path()),
    );
    let bad = Description::test("pkg.ATest", "colored\u{7}");

    writer.test_started(&bad).unwrap();
    writer.test_failure(
        &Failure::new(bad.clone(), "java.lang.AssertionError")
            .with_message("expected \u{1b}[31mred\u{1b}[0m")
            .with_trace(
                "java.lang.AssertionError: expected \u{1b}[31mred\n\
                 \tat pkg.ATest.colored(ATest.java:3)\n",
            ),
    );
    writer.test_finished(&bad);
    writer.close();

    let xml = fs::read_to_string(tmp.path().join("report.xml")).unwrap();
    assert!(
        !xml.chars()
            .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r')),
        "{xml:?}",
    );
    let elements = parse(&xml);
    let failure = named(&elements, "failure")[0];

    assert_eq!(
        named(&elements, "testcase")[0].attr("name"),
        Some("colored\u{FFFD}"),
    );
    assert_eq!(
        failure.attr("message"),
        Some("java.lang.AssertionError: expected \u{FFFD}[31mred\u{FFFD}[0m"),
    );
    assert_eq!(
        failure.text,
        "java.lang.AssertionError: expected \u{FFFD}[31mred\n\
         \tat pkg.ATest.colored(ATest.java:3)\n",
    );
}
