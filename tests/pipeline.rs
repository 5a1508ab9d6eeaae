use docmenu::{build_menu, stoplist, Config, ContentBlock, Document, LinkItem, OutlineBuilder};

fn history_legacy() -> Document {
    Document {
        title: Some("Cats".into()),
        blocks: vec![
            ContentBlock::heading(2, "History"),
            ContentBlock::paragraph("the cat sat on the mat the cat ran"),
            ContentBlock::heading(2, "Legacy"),
        ],
        links: vec![
            LinkItem::heading(2, "History", Some(0)),
            LinkItem::link("https://example.org/cats", "cats"),
            LinkItem::heading(2, "Legacy", Some(2)),
        ],
        toc: None,
    }
}

#[test]
fn history_legacy_scenario() {
    let config = Config {
        section_separators: false,
        ..Config::default()
    };
    let menu = build_menu(&history_legacy(), &config, &stoplist(&config));
    assert_eq!(
        menu.lines,
        vec![
            "\t0 Intro Section",
            "\t1 History - 5 Most Frequent Words: cat (2 times), sat (1 times), mat (1 times), ran (1 times)",
            "\thttps://example.org/cats",
            "\t2 Legacy - 5 Most Frequent Words: ",
        ]
    );
    assert_eq!(menu.title.as_deref(), Some("Cats"));
    assert_eq!(menu.headings, 2);
    assert_eq!(menu.links, 1);
}

#[test]
fn history_legacy_with_separator() {
    let config = Config::default();
    let menu = build_menu(&history_legacy(), &config, &stoplist(&config));
    assert_eq!(menu.lines[2], "\thttps://example.org/cats");
    assert_eq!(menu.lines[3], "");
    assert!(menu.lines[4].starts_with("\t2 Legacy"));
}

#[test]
fn single_heading_yields_two_lines() {
    let config = Config::default();
    let doc = Document {
        blocks: vec![
            ContentBlock::heading(2, "Overview"),
            ContentBlock::paragraph("Volcanoes erupt."),
        ],
        ..Document::default()
    };
    let menu = build_menu(&doc, &config, &stoplist(&config));
    assert_eq!(menu.lines.len(), 2);
    assert_eq!(menu.lines[0], "\t0 Intro Section");
    assert_eq!(
        menu.lines[1],
        "\t1 Overview - 5 Most Frequent Words: volcanoes (1 times), erupt (1 times)"
    );
}

#[test]
fn building_twice_is_byte_identical() {
    let config = Config::default();
    let stop = stoplist(&config);
    let doc = history_legacy();
    let first = build_menu(&doc, &config, &stop);
    let second = build_menu(&doc, &config, &stop);
    assert_eq!(first, second);
}

#[test]
fn without_links_menu_equals_outline() {
    let config = Config::default();
    let stop = stoplist(&config);
    let mut doc = history_legacy();
    doc.links.retain(|item| matches!(item, LinkItem::Heading(_)));
    let outline = OutlineBuilder::new(&config, &stop).build(&doc).render();
    assert_eq!(build_menu(&doc, &config, &stop).lines, outline);
}

#[test]
fn closure_as_stopword_filter() {
    let config = Config::default();
    let doc = Document {
        blocks: vec![ContentBlock::paragraph("alpha beta alpha")],
        ..Document::default()
    };
    let reject_beta = |t: &str| t == "beta";
    let menu = build_menu(&doc, &config, &reject_beta);
    assert_eq!(
        menu.lines,
        vec!["\t0 Intro Section - 5 Most Frequent Words: alpha (2 times)"]
    );
}

#[test]
fn markdown_article_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("volcano.md");
    std::fs::write(
        &path,
        "# Volcano\n\
         \n\
         A volcano is a rupture in the crust. See [crust](https://example.org/crust).\n\
         \n\
         ## Contents\n\
         \n\
         1. [Eruptions](#Eruptions)\n\
         2. [Types of volcano](#Types_of_volcano)\n\
         \n\
         ## Eruptions\n\
         \n\
         Lava flows. Lava cools.\n\
         \n\
         ### Explosive eruptions\n\
         \n\
         Ash clouds, see [ash](https://example.org/ash).\n\
         \n\
         ## Types of volcano\n\
         \n\
         - shield volcano\n\
         - stratovolcano\n",
    )
    .unwrap();

    let config = Config {
        section_separators: false,
        ..Config::default()
    };
    let menu = docmenu::menu_for_path(&path, &config, &stoplist(&config)).unwrap();
    assert_eq!(menu.title.as_deref(), Some("Volcano"));
    assert_eq!(
        menu.lines,
        vec![
            "\t0 Intro Section - 5 Most Frequent Words: crust (2 times), volcano (1 times), rupture (1 times), see (1 times)",
            "\thttps://example.org/crust",
            "\t1 Contents - 5 Most Frequent Words: eruptions (1 times), types (1 times), volcano (1 times)",
            "\t#Eruptions",
            "\t#Types_of_volcano",
            "\t2 Eruptions - 5 Most Frequent Words: lava (2 times), ash (2 times), flows (1 times), cools (1 times), clouds (1 times)",
            "\t\t2.1 Explosive eruptions",
            "\t\thttps://example.org/ash",
            "\t3 Types of volcano - 5 Most Frequent Words: shield (1 times), volcano (1 times), stratovolcano (1 times)",
        ]
    );
    assert_eq!(menu.headings, 4);
    assert_eq!(menu.links, 4);
}

#[test]
fn trailing_subsection_carries_final_summary() {
    let config = Config::default();
    let doc = Document {
        blocks: vec![
            ContentBlock::heading(2, "Life"),
            ContentBlock::heading(3, "Youth"),
            ContentBlock::paragraph("school school"),
        ],
        ..Document::default()
    };
    let menu = build_menu(&doc, &config, &stoplist(&config));
    assert_eq!(
        menu.lines,
        vec![
            "\t0 Intro Section",
            "\t1 Life",
            "\t\t1.1 Youth - 5 Most Frequent Words: school (2 times)",
        ]
    );
}
