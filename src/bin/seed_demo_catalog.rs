// ==========================================
// 开发工具 - 初始化演示目录数据
// ==========================================
// 用法: seed_demo_catalog [db_path]
// 已存在的数据库先备份再重建
// ==========================================

use chrono::Local;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use course_timetable_engine::config::{describe_config, SchedulerConfig};
use course_timetable_engine::db::{default_db_path, init_schema, open_sqlite_connection};

const PROGRAMS: &[(i64, &str, &str)] = &[
    (1, "BSIT", "Bachelor of Science in Information Technology"),
    (2, "BSCS", "Bachelor of Science in Computer Science"),
];

// (room_id, name, type, capacity, program_id)
const ROOMS: &[(i64, &str, &str, i64, Option<i64>)] = &[
    (1, "IT Lab 1", "laboratory", 40, Some(1)),
    (2, "IT Lab 2", "laboratory", 35, Some(1)),
    (3, "CS Lab 1", "laboratory", 40, Some(2)),
    (4, "Shared Lab", "Laboratory", 30, None),
    (5, "Room 101", "lecture", 50, None),
    (6, "Room 102", "lecture", 45, None),
    (7, "Virtual Room", "Online", 0, None),
    (8, "Gymnasium", "field", 200, None),
];

// (faculty_id, name, employment, specialization, program_id)
const FACULTY: &[(i64, &str, &str, Option<&str>, Option<i64>)] = &[
    (1, "Maria Santos", "Full-Time", Some("IT101, IT102, IT201"), Some(1)),
    (2, "Jose Reyes", "Permanent", Some("CS101, CS102, CS201"), Some(2)),
    (3, "Ana Cruz", "Part-Time", Some("IT202, CS202"), Some(1)),
    (4, "Luis Garcia", "Affiliate", Some("GE101, GE102"), None),
    (5, "Carmen Lopez", "Affiliate", None, None),
    (6, "Pedro Ramos", "part time", None, Some(2)),
];

// (course_id, code, title, units, type, year_level, semester, program_id)
const COURSES: &[(i64, &str, &str, i64, &str, i64, &str, i64)] = &[
    (1, "IT101", "Introduction to Computing", 3, "major", 1, "1st Semester", 1),
    (2, "IT102", "Computer Programming 1", 3, "major", 1, "1st Semester", 1),
    (3, "GE101", "Understanding the Self", 3, "minor", 1, "1st Semester", 1),
    (4, "IT201", "Data Structures", 3, "major", 2, "1st Semester", 1),
    (5, "IT202", "Web Systems", 3, "major", 2, "2nd Semester", 1),
    (6, "GE102", "Purposive Communication", 3, "minor", 2, "1st Semester", 1),
    (7, "CS101", "Discrete Structures", 3, "major", 1, "1st Semester", 2),
    (8, "CS102", "Fundamentals of Programming", 3, "major", 1, "1st Semester", 2),
    (9, "GE101", "Understanding the Self", 3, "minor", 1, "1st Semester", 2),
    (10, "CS201", "Algorithms", 3, "major", 2, "1st Semester", 2),
    (11, "CS202", "Operating Systems", 3, "major", 2, "2nd Semester", 2),
];

// (section_id, name, program_id, year_level)
const SECTIONS: &[(i64, &str, i64, i64)] = &[
    (1, "BSIT 1A", 1, 1),
    (2, "BSIT 1B", 1, 1),
    (3, "BSIT 2A", 1, 2),
    (4, "BSCS 1A", 2, 1),
    (5, "BSCS 2A", 2, 2),
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    seed_catalog(&conn)?;
    seed_config(&conn)?;

    print_quick_counts(&conn)?;
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_catalog(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tx = conn.unchecked_transaction()?;

    for (id, code, name) in PROGRAMS {
        tx.execute(
            "INSERT INTO program (program_id, program_code, program_name) VALUES (?1, ?2, ?3)",
            params![id, code, name],
        )?;
    }
    for (id, name, room_type, capacity, program_id) in ROOMS {
        tx.execute(
            "INSERT INTO room (room_id, room_name, room_type, capacity, program_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, name, room_type, capacity, program_id],
        )?;
    }
    for (id, name, employment, specialization, program_id) in FACULTY {
        tx.execute(
            "INSERT INTO faculty (faculty_id, name, employment_type, specialization, program_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, name, employment, specialization, program_id],
        )?;
    }
    for (id, code, title, units, course_type, year_level, semester, program_id) in COURSES {
        tx.execute(
            r#"INSERT INTO course (
                course_id, course_code, title, units, course_type, year_level, semester, program_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![id, code, title, units, course_type, year_level, semester, program_id],
        )?;
    }
    for (id, name, program_id, year_level) in SECTIONS {
        tx.execute(
            "INSERT INTO section (section_id, section_name, program_id, year_level) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, program_id, year_level],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// 写入默认排课参数，便于直接在 config_kv 中修改
fn seed_config(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for (key, value) in describe_config(&SchedulerConfig::default()) {
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
    }
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    for table in ["program", "room", "faculty", "course", "section", "config_kv"] {
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        eprintln!("{:<10} {}", table, count);
    }
    Ok(())
}
