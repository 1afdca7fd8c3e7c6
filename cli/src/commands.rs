use std::str::FromStr;

use core_types::ItemId;

pub const HELP: &str = "\
Commands:
  k            keep the current photo
  d            discard the current photo
  u            undo the last decision
  s            reshuffle the remaining photos
  p            list photos pending deletion
  r <id>       restore a pending photo
  c            move pending photos to trash
  x            permanently delete pending photos
  t            list photos in trash
  tr <id...>   restore photos from trash
  td <id...>   permanently delete photos from trash
  h            show this help
  q            quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Keep,
    Discard,
    Undo,
    Shuffle,
    ListPending,
    Restore(ItemId),
    ConfirmTrash,
    ConfirmDelete,
    ListSystemTrash,
    RestoreFromTrash(Vec<ItemId>),
    DeleteFromTrash(Vec<ItemId>),
    Help,
    Quit,
}

fn parse_ids<'a>(args: impl Iterator<Item = &'a str>) -> Result<Vec<ItemId>, String> {
    let ids = args
        .map(|arg| {
            ItemId::from_str(arg).map_err(|e| format!("'{}' is not a photo id: {}", arg, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Err("At least one photo id is required".to_string());
    }
    Ok(ids)
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err("Empty command".to_string());
        };

        let parsed = match command {
            "k" => Command::Keep,
            "d" => Command::Discard,
            "u" => Command::Undo,
            "s" => Command::Shuffle,
            "p" => Command::ListPending,
            "r" => {
                let ids = parse_ids(words.by_ref())?;
                if ids.len() > 1 {
                    return Err("Restore takes a single photo id".to_string());
                }
                Command::Restore(ids[0])
            }
            "c" => Command::ConfirmTrash,
            "x" => Command::ConfirmDelete,
            "t" => Command::ListSystemTrash,
            "tr" => Command::RestoreFromTrash(parse_ids(words.by_ref())?),
            "td" => Command::DeleteFromTrash(parse_ids(words.by_ref())?),
            "h" | "?" => Command::Help,
            "q" => Command::Quit,
            other => return Err(format!("Unknown command '{}', type h for help", other)),
        };

        if words.next().is_some() {
            return Err(format!("Too many arguments for '{}'", command));
        }
        Ok(parsed)
    }
}
