//! End-to-end extraction over realistic SIU report exports.

use catedras_core::{
    extract_sections, extract_teachers, segment_terms, CoreError, Offer, Teacher, Term,
};

const INFORMATICA: &str = include_str!("fixtures/informatica.txt");

fn term(year: u16, number: u8) -> Term {
    Term::new(year, number).unwrap()
}

fn section_codes(offer: &Offer, subject: &str) -> Vec<u32> {
    offer
        .subject(subject)
        .unwrap_or_else(|| panic!("missing subject {subject}"))
        .sections
        .iter()
        .map(|s| s.code)
        .collect()
}

#[test]
fn summer_course_is_not_a_term() {
    let terms: Vec<Term> = segment_terms(INFORMATICA).into_iter().map(|(t, _)| t).collect();
    assert_eq!(terms, vec![term(2024, 2), term(2025, 1)]);
}

#[test]
fn earlier_term_keeps_only_staffed_sections() {
    let offers = Offer::parse("Informática", INFORMATICA);
    let first = &offers[0];
    assert_eq!(first.term, term(2024, 2));
    assert_eq!(first.subjects.len(), 1);
    assert_eq!(section_codes(first, "Algoritmos y Estructuras de Datos"), vec![1]);
}

#[test]
fn latest_term_subjects() {
    let offer = Offer::parse_latest("Informática", INFORMATICA).unwrap();
    assert_eq!(offer.term, term(2025, 1));

    let names: Vec<&str> = offer.subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "ALGORITMOS Y ESTRUCTURAS DE DATOS",
            "ORGANIZACIÓN DEL COMPUTADOR",
            "TALLER DE PROGRAMACIÓN",
        ]
    );
}

#[test]
fn professional_work_never_appears() {
    for offer in Offer::parse("Informática", INFORMATICA) {
        assert!(offer
            .subjects
            .iter()
            .all(|s| !s.name.contains("TRABAJO PROFESIONAL")));
    }
}

#[test]
fn conditional_section_is_ignored() {
    let offer = Offer::parse_latest("Informática", INFORMATICA).unwrap();
    assert_eq!(section_codes(&offer, "ALGORITMOS Y ESTRUCTURAS DE DATOS"), vec![1, 5]);
    let algo = offer.subject("ALGORITMOS Y ESTRUCTURAS DE DATOS").unwrap();
    assert!(algo
        .sections
        .iter()
        .all(|s| s.teachers.iter().all(|t| t.name != "NADIE NADIE")));
}

#[test]
fn lettered_variants_collapse_into_one_section() {
    let offer = Offer::parse_latest("Informática", INFORMATICA).unwrap();
    let orga = offer.subject("Organización del Computador").unwrap();
    assert_eq!(orga.sections.len(), 1);
    assert_eq!(orga.sections[0].code, 23);

    let expected: Vec<Teacher> = vec![
        Teacher::new("FAGES LUCIANO RODOLFO", "AYUDANTE 1RO"),
        Teacher::new("RIOS ANA", "AYUDANTE 2DO"),
        Teacher::new("SARRIS CLAUDIA MONICA", "PROFESOR ADJUNTO"),
    ];
    let got: Vec<Teacher> = orga.sections[0].teachers.iter().cloned().collect();
    assert_eq!(got, expected);
}

#[test]
fn unnamed_section_follows_highest_code() {
    let offer = Offer::parse_latest("Informática", INFORMATICA).unwrap();
    assert_eq!(section_codes(&offer, "TALLER DE PROGRAMACIÓN"), vec![1, 7, 8]);
}

#[test]
fn variant_order_does_not_matter() {
    let variants = [
        "Comisión: CURSO: 23A\nDocentes: SARRIS CLAUDIA MONICA (Profesor/a Adjunto/a)\n",
        "Comisión: CURSO: 23B\nDocentes: FAGES LUCIANO RODOLFO (Ayudante 1ro/a)\n",
        "Comisión: CURSO: 23C\nDocentes: RIOS ANA (Ayudante 2do/a), SARRIS CLAUDIA MONICA (Profesor/a Adjunto/a)\n",
    ];
    let permutations = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let reference = extract_sections(&variants.concat());
    assert_eq!(reference.len(), 1);
    for perm in permutations {
        let slice: String = perm.iter().map(|&i| variants[i]).collect();
        assert_eq!(extract_sections(&slice), reference, "permutation {perm:?}");
    }
}

#[test]
fn teacher_line_example() {
    let teachers = extract_teachers(
        "SARRIS CLAUDIA MONICA (Profesor/a Adjunto/a), FAGES LUCIANO RODOLFO (Ayudante 1ro/a)",
    )
    .unwrap();
    let pairs: Vec<(&str, &str)> = teachers
        .iter()
        .map(|t| (t.name.as_str(), t.role.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("SARRIS CLAUDIA MONICA", "PROFESOR ADJUNTO"),
            ("FAGES LUCIANO RODOLFO", "AYUDANTE 1RO"),
        ]
    );
}

#[test]
fn report_without_terms() {
    assert!(Offer::parse("X", "Actividad: Física I (CB003)\nComisión: 01\n").is_empty());
    assert_eq!(
        Offer::parse_latest("X", "").unwrap_err(),
        CoreError::NoTermsFound
    );
}

#[test]
fn offers_serialize_with_snake_case_fields() {
    let offer = Offer::parse_latest("Informática", INFORMATICA).unwrap();
    let json = serde_json::to_value(&offer).unwrap();
    assert_eq!(json["program"], "Informática");
    assert_eq!(json["term"]["year"], 2025);
    assert_eq!(json["subjects"][0]["code"], "TB023");
    assert_eq!(json["subjects"][0]["sections"][0]["code"], 1);
}
