//! Catalog input models.
//!
//! Rooms, courses, students, and the student-course eligibility relation.
//! These are immutable inputs supplied by the caller's persistence layer;
//! the engine never modifies them.

use serde::{Deserialize, Serialize};

use super::Shift;

/// A physical room that can host one section per time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Display code (e.g., "A-101").
    pub code: String,
    /// Number of seats.
    pub capacity: u32,
}

/// A course that sections are opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Catalog code (e.g., "MAT-101").
    pub code: String,
    /// Human-readable name.
    pub name: Option<String>,
}

/// A student enrolled in exactly one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: String,
    /// Human-readable name.
    pub name: Option<String>,
    /// Shift the student attends.
    pub shift: Shift,
}

/// Permission for a student to take a course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Eligibility {
    /// Student identifier.
    pub student_id: String,
    /// Course identifier.
    pub course_id: String,
}

/// Complete engine input.
///
/// Element order is significant: it is the tie-breaking order used by the
/// allocator and the assignment passes, which keeps runs deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Available rooms.
    pub rooms: Vec<Room>,
    /// Offered courses.
    pub courses: Vec<Course>,
    /// Students to place.
    pub students: Vec<Student>,
    /// Student-course eligibility pairs.
    pub eligibilities: Vec<Eligibility>,
}

impl Room {
    /// Creates a room whose code equals its ID.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            capacity,
        }
    }

    /// Sets the display code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

impl Course {
    /// Creates a course whose code equals its ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: None,
        }
    }

    /// Sets the catalog code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Student {
    /// Creates a student in the given shift.
    pub fn new(id: impl Into<String>, shift: Shift) -> Self {
        Self {
            id: id.into(),
            name: None,
            shift,
        }
    }

    /// Sets the student name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Eligibility {
    /// Creates an eligibility pair.
    pub fn new(student_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: course_id.into(),
        }
    }
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds a student.
    pub fn with_student(mut self, student: Student) -> Self {
        self.students.push(student);
        self
    }

    /// Marks a student as eligible for a course.
    pub fn with_eligibility(
        mut self,
        student_id: impl Into<String>,
        course_id: impl Into<String>,
    ) -> Self {
        self.eligibilities
            .push(Eligibility::new(student_id, course_id));
        self
    }

    /// Finds a course by ID.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Finds a student by ID.
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Course IDs a student is eligible for (may repeat if the input does).
    pub fn eligible_courses(&self, student_id: &str) -> Vec<&str> {
        self.eligibilities
            .iter()
            .filter(|e| e.student_id == student_id)
            .map(|e| e.course_id.as_str())
            .collect()
    }
}
