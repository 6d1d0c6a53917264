use bytes::Bytes;
use std::fmt::Write;

use crate::commands::executable::{Context, Executable};
use crate::commands::parser::CommandParser;
use crate::commands::CommandError;
use crate::frame::Frame;

const SECTIONS: [&str; 5] = ["server", "clients", "persistence", "replication", "keyspace"];

/// Information and statistics about the server, in the `field:value` format of Redis, one
/// `# Section` header per section.
///
/// Ref: <https://redis.io/docs/latest/commands/info/>
#[derive(Debug, PartialEq)]
pub struct Info {
    /// Requested sections, lowercased. Empty means all of them.
    pub sections: Vec<String>,
}

impl Info {
    fn wants(&self, section: &str) -> bool {
        self.sections.is_empty()
            || self
                .sections
                .iter()
                .any(|s| s == section || s == "all" || s == "default" || s == "everything")
    }
}

impl Executable for Info {
    fn exec(self, ctx: &mut Context) -> Result<Frame, CommandError> {
        let store = ctx.store;
        let mut out = String::new();

        for section in SECTIONS.iter().filter(|section| self.wants(section)) {
            if !out.is_empty() {
                out.push_str("\r\n");
            }

            let _ = match *section {
                "server" => {
                    let uptime = store.uptime().as_secs();
                    write!(
                        out,
                        "# Server\r\n\
                         redis_version:7.2.4\r\n\
                         memdis_version:{}\r\n\
                         redis_mode:standalone\r\n\
                         os:{}\r\n\
                         arch_bits:{}\r\n\
                         process_id:{}\r\n\
                         run_id:{}\r\n\
                         tcp_port:{}\r\n\
                         uptime_in_seconds:{}\r\n\
                         uptime_in_days:{}\r\n",
                        env!("CARGO_PKG_VERSION"),
                        std::env::consts::OS,
                        usize::BITS,
                        std::process::id(),
                        store.run_id(),
                        store.config().port,
                        uptime,
                        uptime / 86_400,
                    )
                }
                "clients" => write!(
                    out,
                    "# Clients\r\nconnected_clients:{}\r\nblocked_clients:{}\r\n",
                    store.clients().len(),
                    store.blocking().len(),
                ),
                "persistence" => write!(out, "# Persistence\r\nloading:0\r\naof_enabled:0\r\n"),
                "replication" => write!(out, "# Replication\r\nrole:master\r\nconnected_slaves:0\r\n"),
                _ => {
                    let _ = write!(out, "# Keyspace\r\n");
                    for index in 0..store.databases() {
                        let mut keyspace = store.db(index);
                        let keys = keyspace.len();
                        if keys == 0 {
                            continue;
                        }
                        let _ = write!(
                            out,
                            "db{}:keys={},expires={},avg_ttl=0\r\n",
                            index,
                            keys,
                            keyspace.expires()
                        );
                    }
                    Ok(())
                }
            };
        }

        Ok(Frame::Bulk(Bytes::from(out)))
    }
}

impl TryFrom<&mut CommandParser> for Info {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let sections = parser
            .rest_strings()?
            .into_iter()
            .map(|section| section.to_lowercase())
            .collect();

        Ok(Self { sections })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::run;
    use crate::session::Session;
    use crate::store::Store;

    fn info(frame: Frame) -> String {
        match frame {
            Frame::Bulk(bytes) => String::from_utf8(bytes.to_vec()).unwrap(),
            frame => panic!("expected bulk, got {}", frame),
        }
    }

    #[test]
    fn all_sections() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);
        run(&store, &mut session, &["SET", "a", "1"]);
        run(&store, &mut session, &["SET", "b", "1", "EX", "100"]);

        let out = info(run(&store, &mut session, &["INFO"]));

        assert!(out.starts_with("# Server\r\n"));
        assert!(out.contains(&format!("run_id:{}\r\n", store.run_id())));
        assert!(out.contains("# Clients\r\n"));
        assert!(out.contains("db0:keys=2,expires=1,avg_ttl=0\r\n"));
    }

    #[test]
    fn single_section() {
        let store = Store::default();
        let (mut session, _rx) = Session::new(1, None);

        let out = info(run(&store, &mut session, &["INFO", "Replication"]));

        assert_eq!(out, "# Replication\r\nrole:master\r\nconnected_slaves:0\r\n");
    }
}
