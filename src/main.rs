// ==========================================
// 课程排课系统 - 命令行入口
// ==========================================
// 用法: course-timetable [db_path] [semester] [--persist] [--csv <file>]
// 输出: 生成结果 JSON 写到 stdout，日志写到 stderr
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{debug, info};

use course_timetable_engine::api::ScheduleApi;
use course_timetable_engine::config::{describe_config, ConfigManager, SchedulerConfigReader};
use course_timetable_engine::db::{default_db_path, init_schema, open_sqlite_connection};
use course_timetable_engine::domain::ScheduledSession;
use course_timetable_engine::engine::AllocationOrchestrator;
use course_timetable_engine::logging;
use course_timetable_engine::repository::{SqliteCatalogRepository, SqliteScheduleRepository};

const USAGE: &str = "用法: course-timetable [db_path] [semester] [--persist] [--csv <file>]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    db_path: Option<String>,
    semester: Option<String>,
    persist: bool,
    csv_path: Option<PathBuf>,
    help: bool,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = CliArgs::default();
        let mut positional = Vec::new();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--persist" => parsed.persist = true,
                "--csv" => match iter.next() {
                    Some(path) => parsed.csv_path = Some(PathBuf::from(path)),
                    None => bail!("--csv 缺少文件路径\n{}", USAGE),
                },
                "-h" | "--help" => parsed.help = true,
                flag if flag.starts_with("--") => bail!("未知参数: {}\n{}", flag, USAGE),
                _ => positional.push(arg),
            }
        }

        if positional.len() > 2 {
            bail!("位置参数过多\n{}", USAGE);
        }
        let mut positional = positional.into_iter();
        parsed.db_path = positional.next();
        parsed.semester = positional.next().filter(|s| !s.trim().is_empty());
        Ok(parsed)
    }
}

fn export_csv(path: &Path, sessions: &[ScheduledSession]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("无法创建 CSV 文件: {}", path.display()))?;
    for session in sessions {
        writer.serialize(session)?;
    }
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    info!("==================================================");
    info!("{} v{}", course_timetable_engine::APP_NAME, course_timetable_engine::VERSION);
    info!("==================================================");

    let db_path = args.db_path.clone().unwrap_or_else(default_db_path);
    info!("使用数据库: {}", db_path);
    {
        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        init_schema(&conn)?;
    }

    // 配置启动时校验，非法配置直接退出
    let config_manager = ConfigManager::new(&db_path)?;
    let config = config_manager.load_scheduler_config().await?;
    for (key, value) in describe_config(&config) {
        debug!(key, value = %value, "生效配置");
    }
    let orchestrator = AllocationOrchestrator::new(config)?;

    let catalog_repo = Arc::new(SqliteCatalogRepository::new(&db_path)?);
    let mut api = ScheduleApi::new(catalog_repo, orchestrator);
    if args.persist {
        api = api.with_store(Arc::new(SqliteScheduleRepository::new(&db_path)?));
    }

    let semester = args.semester.clone();
    let persist = args.persist;
    let response = tokio::task::spawn_blocking(move || {
        if persist {
            api.generate_and_store(semester.as_deref())
        } else {
            api.generate(semester.as_deref())
        }
    })
    .await??;

    if let Some(csv_path) = &args.csv_path {
        export_csv(csv_path, &response.data.schedules)?;
        info!("课次已导出: {}", csv_path.display());
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> anyhow::Result<CliArgs> {
        CliArgs::parse(raw.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let parsed = args(&["db.sqlite", "1st Semester", "--persist", "--csv", "out.csv"]).unwrap();
        assert_eq!(parsed.db_path.as_deref(), Some("db.sqlite"));
        assert_eq!(parsed.semester.as_deref(), Some("1st Semester"));
        assert!(parsed.persist);
        assert_eq!(parsed.csv_path, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(args(&["--csv"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a", "b", "c"]).is_err());
        assert_eq!(args(&[]).unwrap(), CliArgs::default());
    }
}
