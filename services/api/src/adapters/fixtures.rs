//! services/api/src/adapters/fixtures.rs
//!
//! Demo records loaded into a fresh store at startup when `SEED_FIXTURES` is on.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use study_dashboard_core::{
    domain::{
        Course, DayOfWeek, NewDocument, NewNote, Quiz, QuizOption, QuizQuestion,
        TimetableEventDraft, UserProfile,
    },
    ports::{PortError, PortResult, StudyRepository},
    quiz::grade_attempt,
};
use tracing::info;
use uuid::Uuid;

const CREDITS_PER_COURSE: u32 = 3;

struct CourseSeed {
    name: &'static str,
    code: &'static str,
    instructor: &'static str,
    description: &'static str,
    icon: &'static str,
    icon_bg_color: &'static str,
    difficulty: &'static str,
    rating: f32,
    progress: u8,
    next_class_time: &'static str,
    due_soon_task: &'static str,
    student_count: u32,
    discussion_count: u32,
    notification: Option<&'static str>,
}

const COURSES: [CourseSeed; 5] = [
    CourseSeed {
        name: "Net-Centric & Internet Programming",
        code: "CSC 402",
        instructor: "Dr. Tim Berners-Lee",
        description: "Fundamentals of network programming, client-server architectures, and web technologies including HTML, CSS, JavaScript, and server-side scripting.",
        icon: "globe",
        icon_bg_color: "bg-cyan-100 dark:bg-cyan-900",
        difficulty: "Intermediate",
        rating: 4.7,
        progress: 55,
        next_class_time: "Today, 1:00 PM",
        due_soon_task: "Project Phase 1 - Due Next Week",
        student_count: 90,
        discussion_count: 10,
        notification: Some("New assignment posted"),
    },
    CourseSeed {
        name: "Human Computer Interface",
        code: "CSC 404",
        instructor: "Dr. Alan Kay",
        description: "Principles of designing, implementing, and evaluating user interfaces. Usability heuristics, user-centered design, and HCI theories.",
        icon: "mouse-pointer-square-dashed",
        icon_bg_color: "bg-orange-100 dark:bg-orange-900",
        difficulty: "Intermediate",
        rating: 4.6,
        progress: 40,
        next_class_time: "Tomorrow, 11:00 AM",
        due_soon_task: "Usability Report - Due Friday",
        student_count: 75,
        discussion_count: 8,
        notification: None,
    },
    CourseSeed {
        name: "Computer Modeling and Simulation",
        code: "CSC 406",
        instructor: "Dr. John von Neumann",
        description: "Techniques for modeling complex systems and simulating their behavior. Discrete-event simulation, continuous simulation, and statistical analysis of results.",
        icon: "projector",
        icon_bg_color: "bg-lime-100 dark:bg-lime-900",
        difficulty: "Advanced",
        rating: 4.8,
        progress: 60,
        next_class_time: "Wednesday, 10:00 AM",
        due_soon_task: "Simulation Model Design",
        student_count: 65,
        discussion_count: 12,
        notification: None,
    },
    CourseSeed {
        name: "Computer Graphics and Visualization",
        code: "CSC 412",
        instructor: "Dr. Ed Catmull",
        description: "Algorithms and techniques for 2D/3D computer graphics, rendering pipelines, geometric transformations, and data visualization.",
        icon: "image",
        icon_bg_color: "bg-pink-100 dark:bg-pink-900",
        difficulty: "Advanced",
        rating: 4.9,
        progress: 35,
        next_class_time: "Friday, 2:00 PM",
        due_soon_task: "OpenGL Lab 2",
        student_count: 70,
        discussion_count: 9,
        notification: None,
    },
    CourseSeed {
        name: "Special Topics in Software Engineering",
        code: "CSC 408",
        instructor: "Dr. Grady Booch",
        description: "Exploring advanced and emerging topics in software engineering, including Agile methodologies, DevOps, microservices, and software architecture patterns.",
        icon: "settings-2",
        icon_bg_color: "bg-indigo-100 dark:bg-indigo-900",
        difficulty: "Advanced",
        rating: 4.7,
        progress: 25,
        next_class_time: "Thursday, 3:00 PM",
        due_soon_task: "Research Paper Proposal",
        student_count: 55,
        discussion_count: 6,
        notification: None,
    },
];

// (course code, name, color, day, start, end, description)
#[rustfmt::skip]
const EVENTS: [(&str, &str, &str, DayOfWeek, &str, &str, &str); 6] = [
    ("CSC 402", "Net-Centric & Internet Programming", "bg-primary", DayOfWeek::Monday, "09:00", "10:30", "Lecture in Tech Hall 101, covering Chapter 3."),
    ("CSC 404", "Human Computer Interface", "bg-accent", DayOfWeek::Monday, "11:00", "12:30", "Interactive session in Design Studio B. Bring wireframes."),
    ("CSC 406", "Computer Modeling and Simulation", "bg-secondary", DayOfWeek::Tuesday, "14:00", "15:30", "Lab session in Science Hub A. Focus on DES software."),
    ("CSC 412", "Computer Graphics and Visualization", "bg-primary/70", DayOfWeek::Wednesday, "10:00", "11:30", "Lecture on 3D transformations, Graphics Lab 3."),
    ("CSC 402", "Net-Centric Programming Lab", "bg-primary", DayOfWeek::Wednesday, "13:00", "14:30", "Practical lab work in Tech Hall Lab 2."),
    ("CSC 408", "Special Topics in SE Seminar", "bg-accent", DayOfWeek::Thursday, "15:00", "16:30", "Guest speaker on DevOps, Eng. Auditorium."),
];

// Oldest first, so the newest ends up on top.
#[rustfmt::skip]
const NOTES: [(&str, &str, &str, Option<&str>); 4] = [
    ("CSC 402", "Lecture 1: HTTP Basics", "Request methods (GET, POST, PUT, DELETE), status codes, headers. Client-server model.", None),
    ("CSC 402", "Lecture 2: HTML & CSS", "Basic HTML structure, common tags. CSS selectors, box model, flexbox basics.", Some("This lecture covered fundamental HTML elements and CSS styling concepts, including selectors and layout with flexbox.")),
    ("CSC 404", "Usability Heuristics", "Nielsen's 10 usability heuristics. Examples and applications in UI design evaluation.", None),
    ("CSC 406", "Discrete Event Simulation", "Components of DES: entities, attributes, activities, events, state variables. Event scheduling.", None),
];

const SYLLABUS_CSC402: &str = "Course Syllabus: CSC 402 - Net-Centric & Internet Programming

Instructor: Dr. Tim Berners-Lee
Office Hours: Mondays 1-3 PM, Tech Hall 303

Course Description:
This course covers the fundamentals of network programming and web technologies. Topics include client-server architecture, HTTP protocol, HTML, CSS, JavaScript, and server-side scripting.

Learning Objectives:
- Understand internet protocols and client-server communication.
- Develop static and dynamic web pages.
- Implement basic server-side logic.

Grading:
- Assignments: 50%
- Midterm Project: 20%
- Final Project: 30%

Schedule (Tentative):
Week 1-2: Introduction to Internet, HTTP
Week 3-5: HTML, CSS";

const HCI_PRINCIPLES: &str = "CSC 404 - Human Computer Interface: Design Principles

Key Principles:
1. Visibility of System Status: Users should always be informed about what is going on.
2. Match between System and Real World: Speak the users' language.
3. User Control and Freedom: Users need an \"emergency exit\".
4. Consistency and Standards: Users should not have to wonder whether different words, situations, or actions mean the same thing.
5. Error Prevention: Design to prevent problems from occurring.
6. Recognition rather than Recall: Make objects, actions, and options visible.
7. Flexibility and Efficiency of Use: Allow users to tailor frequent actions.
8. Aesthetic and Minimalist Design: Dialogues should not contain irrelevant information.
9. Help Users Recognize, Diagnose, and Recover from Errors: Error messages should be expressed in plain language.
10. Help and Documentation: Provide help and documentation.";

const MODELING_INTRO: &str = "CSC 406 - Computer Modeling and Simulation: Lecture 1 - Introduction

What is Modeling?
- Creating a simplified representation of a real-world system or process.
- Captures essential characteristics and behaviors.

What is Simulation?
- Imitating the operation of a real-world process or system over time.
- Involves generating an artificial history of a system and observing that history to draw inferences.

Types of Simulation:
- Discrete-Event Simulation
- Continuous Simulation
- Agent-Based Modeling

Applications: Manufacturing, healthcare, finance, logistics, military.";

const RENDERING_PIPELINE: &str = "CSC 412 - Computer Graphics: The Rendering Pipeline

The rendering pipeline is a conceptual model that describes the steps a graphics system goes through to render a 3D scene to a 2D screen.

Key Stages:
1. Application Stage: Handled by software on the CPU (game logic, physics).
2. Geometry Processing: model and view transformation, projection, clipping, screen mapping.
3. Rasterization: Converts geometric primitives (triangles) into a set of pixels (fragments).
4. Fragment Processing (Pixel Shading): Calculates the color of each fragment (lighting, texturing).
5. Per-Sample Operations: Depth testing, blending, stencil testing.
6. Framebuffer Operations: Writing final pixel colors to the framebuffer.

Modern pipelines are highly programmable (shaders).";

// Oldest first.
const DOCUMENTS: [(&str, &str, &str, bool, Option<&str>); 5] = [
    ("CSC 402", "Syllabus_CSC402.pdf", "PDF", true, Some(SYLLABUS_CSC402)),
    ("CSC 404", "HCI_Design_Principles.pdf", "PDF", true, Some(HCI_PRINCIPLES)),
    ("CSC 406", "Lecture1_IntroToModeling.pdf", "PDF", true, Some(MODELING_INTRO)),
    ("CSC 402", "Assignment1_WebBasics.docx", "DOCX", false, None),
    ("CSC 412", "Lecture_Notes_Rendering_Pipeline.pdf", "PDF", true, Some(RENDERING_PIPELINE)),
];

fn question(text: &str, options: [&str; 4], correct: usize, explanation: &str) -> QuizQuestion {
    let options: Vec<QuizOption> = options
        .iter()
        .map(|text| QuizOption {
            id: Uuid::new_v4(),
            text: text.to_string(),
        })
        .collect();
    QuizQuestion {
        id: Uuid::new_v4(),
        text: text.to_string(),
        correct_option_id: options[correct].id,
        options,
        explanation: Some(explanation.to_string()),
    }
}

fn course_id(ids: &HashMap<&str, Uuid>, code: &str) -> PortResult<Uuid> {
    ids.get(code)
        .copied()
        .ok_or_else(|| PortError::NotFound(format!("Fixture course {} not found", code)))
}

/// Fills `repo` with the demo dashboard: five courses, their weekly classes, a few
/// notes and lecture documents, two quizzes and one attempt at each.
pub async fn seed(repo: &dyn StudyRepository) -> PortResult<()> {
    repo.set_profile(UserProfile {
        name: "Oyedele Onaolamipo.V".to_string(),
        degree_major: "B.SC Computer Science".to_string(),
        department: "Computer Science & Mathematics".to_string(),
        current_year: 3,
        current_semester: "Second".to_string(),
        courses_taken: COURSES.len() as u32,
        units_taken: COURSES.len() as u32 * CREDITS_PER_COURSE,
        avatar_url: "https://placehold.co/100x100.png".to_string(),
        university: "State University".to_string(),
        is_admin: true,
    })
    .await?;

    let mut ids = HashMap::new();
    for seed in &COURSES {
        let course = Course {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            code: seed.code.to_string(),
            instructor: seed.instructor.to_string(),
            credits: CREDITS_PER_COURSE,
            description: seed.description.to_string(),
            icon: Some(seed.icon.to_string()),
            color: None,
            icon_bg_color: Some(seed.icon_bg_color.to_string()),
            top_border_color: Some("border-primary".to_string()),
            difficulty: Some(seed.difficulty.to_string()),
            rating: Some(seed.rating),
            progress: Some(seed.progress),
            next_class_time: Some(seed.next_class_time.to_string()),
            due_soon_task: Some(seed.due_soon_task.to_string()),
            student_count: Some(seed.student_count),
            discussion_count: Some(seed.discussion_count),
            notification: seed.notification.map(str::to_string),
        };
        ids.insert(seed.code, course.id);
        repo.insert_course(course).await?;
    }

    for (code, name, color, day, start, end, description) in EVENTS {
        let draft = TimetableEventDraft {
            course_id: Some(course_id(&ids, code)?),
            course_name: name.to_string(),
            course_color: color.to_string(),
            day,
            start_time: start
                .parse()
                .map_err(|e| PortError::Unexpected(format!("{}", e)))?,
            end_time: end
                .parse()
                .map_err(|e| PortError::Unexpected(format!("{}", e)))?,
            description: description.to_string(),
        };
        repo.create_event(draft).await?;
    }

    for (code, title, content, summary) in NOTES {
        repo.create_note(NewNote {
            course_id: course_id(&ids, code)?,
            title: title.to_string(),
            content: content.to_string(),
            summary: summary.map(str::to_string),
        })
        .await?;
    }

    for (code, name, file_type, is_lecture_note, content) in DOCUMENTS {
        repo.create_document(NewDocument {
            course_id: course_id(&ids, code)?,
            name: name.to_string(),
            url: "#".to_string(),
            file_type: file_type.to_string(),
            is_lecture_note,
            content: content.map(str::to_string),
        })
        .await?;
    }

    let web_quiz = Quiz {
        id: Uuid::new_v4(),
        course_id: course_id(&ids, "CSC 402")?,
        title: "HTTP & Web Basics Quiz".to_string(),
        description: Some("Test your knowledge on fundamental HTTP and web concepts.".to_string()),
        questions: vec![
            question(
                "Which HTTP method is typically used for retrieving data?",
                ["POST", "GET", "PUT", "DELETE"],
                1,
                "GET is used to request data from a specified resource.",
            ),
            question(
                "What does HTML stand for?",
                [
                    "HyperText Markup Language",
                    "HighTech Modern Language",
                    "Hyperlink and Text Markup Language",
                    "Home Tool Markup Language",
                ],
                0,
                "HTML stands for HyperText Markup Language.",
            ),
        ],
    };
    let hci_quiz = Quiz {
        id: Uuid::new_v4(),
        course_id: course_id(&ids, "CSC 404")?,
        title: "Usability Principles Quiz".to_string(),
        description: Some("A quick quiz on common HCI usability principles.".to_string()),
        questions: vec![question(
            "Which principle suggests that users should always be aware of what is happening in the system?",
            [
                "Consistency and Standards",
                "Visibility of System Status",
                "User Control and Freedom",
                "Error Prevention",
            ],
            1,
            "Visibility of System Status ensures users are informed through appropriate feedback.",
        )],
    };

    // One wrong and one right answer on the web quiz, a clean pass on the HCI quiz.
    let web_answers = HashMap::from([
        (web_quiz.questions[0].id, web_quiz.questions[0].options[0].id),
        (web_quiz.questions[1].id, web_quiz.questions[1].correct_option_id),
    ]);
    let hci_answers = HashMap::from([(
        hci_quiz.questions[0].id,
        hci_quiz.questions[0].correct_option_id,
    )]);
    let now = Utc::now();
    for (quiz, answers, days_ago) in [(&web_quiz, web_answers, 3), (&hci_quiz, hci_answers, 1)] {
        let attempt = grade_attempt(quiz, &answers, now - Duration::days(days_ago))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        repo.save_attempt(attempt).await?;
    }
    repo.save_quiz(web_quiz).await?;
    repo.save_quiz(hci_quiz).await?;

    info!(
        "Seeded {} courses, {} timetable events, {} notes and {} documents",
        COURSES.len(),
        EVENTS.len(),
        NOTES.len(),
        DOCUMENTS.len()
    );
    Ok(())
}
