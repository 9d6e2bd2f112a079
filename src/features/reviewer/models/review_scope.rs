use crate::features::attendance::{AttendanceRecord, Department};

/// Authorization boundary of a reviewer: the one department they may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewScope {
    department: Department,
}

impl ReviewScope {
    pub fn new(department: Department) -> Self {
        Self { department }
    }

    pub fn department(&self) -> Department {
        self.department
    }

    pub fn permits(&self, record: &AttendanceRecord) -> bool {
        record.department == self.department
    }
}
