//! Fixed copy rendered alongside store data.

use serde::Serialize;

pub const DEFAULT_BIO: &str = "Passionate Engineering Project Management professional with expertise in \
construction project management, BIM technologies, and sustainable urban development.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Education {
    pub school: &'static str,
    pub degree: &'static str,
    pub period: &'static str,
    pub location: &'static str,
    pub status: Option<&'static str>,
    pub gpa: Option<&'static str>,
}

pub const EDUCATION: &[Education] = &[
    Education {
        school: "Manchester Metropolitan University",
        degree: "MSc Engineering Project Management",
        period: "2025 - Present",
        location: "Manchester, UK",
        status: Some("Current"),
        gpa: None,
    },
    Education {
        school: "University of Huddersfield",
        degree: "BSc(Hons) Construction Project Management",
        period: "2023 - 2025",
        location: "Huddersfield, UK",
        status: None,
        gpa: None,
    },
    Education {
        school: "Hanoi University of Civil Engineering",
        degree: "Economic Construction",
        period: "2019 - 2023",
        location: "Hanoi, Vietnam",
        status: None,
        gpa: Some("7.45/10"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Award {
    pub title: &'static str,
    pub level: &'static str,
    pub year: &'static str,
}

pub const AWARDS: &[Award] = &[
    Award {
        title: "Student with 5 Merits",
        level: "Province Level",
        year: "2021",
    },
    Award {
        title: "Debate Competition",
        level: "Third Place",
        year: "2022-2023",
    },
    Award {
        title: "Outstanding Individual",
        level: "Recognition",
        year: "January 2023",
    },
    Award {
        title: "Professional Certifications",
        level: "Multiple Qualifications",
        year: "2023",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillGroup {
    pub title: &'static str,
    pub skills: &'static [&'static str],
}

pub const SKILL_GROUPS: &[SkillGroup] = &[
    SkillGroup {
        title: "Software & Tools",
        skills: &["Microsoft Project", "Primavera P6", "AutoCAD", "Revit", "BIM 360", "Navisworks"],
    },
    SkillGroup {
        title: "Project Management",
        skills: &[
            "PMBOK",
            "Agile",
            "Risk Management",
            "Cost Estimation",
            "Scheduling",
            "Stakeholder Management",
        ],
    },
    SkillGroup {
        title: "Technical Skills",
        skills: &[
            "Construction Planning",
            "Quality Control",
            "Contract Management",
            "Health & Safety",
            "Sustainable Design",
            "Value Engineering",
        ],
    },
];

/// Shown on the home page.
pub const CORE_COMPETENCIES: &[&str] = &["Project Management", "BIM Technologies", "Construction Planning"];
