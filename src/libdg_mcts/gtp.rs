// Copyright 2019 Karl Sundequist Blomdahl <karl.sundequist.blomdahl@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The Go Text Protocol front-end (§4 "GTP Engine", grounded in the
//! original engine's `gtp.py`). Reads commands from any `BufRead`, writes
//! `=id ...` / `?id ...` responses to any `Write`.

use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use regex::Regex;

use dg_go::{Color, Point, Rule};
use dg_nn::Processor;

use dg_go::record::Record;

use super::player::{Candidate, Criterion, Player};

const NAME: &str = "dream_go";
const VERSION: &str = "0.6.3";
const PROTOCOL_VERSION: &str = "2";

const KNOWN_COMMANDS: &[&str] = &[
    "protocol_version",
    "name",
    "version",
    "known_command",
    "list_commands",
    "quit",
    "boardsize",
    "clear_board",
    "fixed_handicap",
    "komi",
    "play",
    "genmove",
    "reg_genmove",
    "undo",
    "showboard",
    "time_settings",
    "time_left",
    "final_score",
    "final_status_list",
    "lz-genmove_analyze",
    "lz-analyze",
    "kata-genmove_analyze",
    "kata-analyze",
    "cgos-genmove_analyze",
    "cgos-analyze",
    "gogui-analyze_commands",
    "gogui-analyze_territory",
    "gogui-analyze_values",
    "gogui-analyze_value",
    "cputime",
    "kgs-rules",
    "help",
];

const GOGUI_ANALYZE_COMMANDS: &str = "\
gfx/Territory/gogui-analyze_territory\n\
gfx/Values/gogui-analyze_values\n\
gfx/Value/gogui-analyze_value";

const COLUMNS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

fn point_to_vertex(point: Point, height: usize) -> String {
    if point.is_pass() {
        "pass".to_string()
    } else {
        let col = COLUMNS.chars().nth(point.x() as usize).unwrap_or('?');
        format!("{}{}", col, point.y() + 1)
    }
}

/// Parses a GTP vertex. `"resign"` is not a board position and is left for
/// callers to special-case.
fn vertex_to_point(text: &str) -> Option<Point> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("pass") {
        return Some(Point::pass());
    }

    let mut chars = text.chars();
    let col = chars.next()?.to_ascii_uppercase();
    let x = COLUMNS.find(col)? as i32;
    let row: i32 = chars.as_str().parse().ok()?;

    Some(Point::new(x, row - 1))
}

fn color_from_str(text: &str) -> Option<Color> {
    match text.to_ascii_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

fn color_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

fn pv_to_string(variations: &[Point], height: usize) -> String {
    variations.iter().map(|p| point_to_vertex(*p, height)).collect::<Vec<_>>().join(" ")
}

fn lz_candidates_to_string(candidates: &[Candidate], height: usize) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(order, c)| {
            format!(
                "info move {} visits {} winrate {} lcb {} prior {} order {} pv {}",
                point_to_vertex(c.point, height),
                c.visits,
                (c.win_chance() * 10000.0).round() as i32,
                (c.win_chance_lcb() * 10000.0).round() as i32,
                (c.policy * 10000.0).round() as i32,
                order,
                pv_to_string(&c.variations, height),
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Signed territory ownership from `mover`'s perspective, row-major and
/// top-to-bottom (§6.3 `ownership`). The engine only ever classifies a
/// point as settled `Black`/`White`/neutral, so the floats it emits are
/// always `-1.0`/`0.0`/`1.0` rather than a continuous estimate.
fn ownership_floats(territories: &[Option<Color>], width: usize, height: usize, mover: Color) -> Vec<f32> {
    let mut values = Vec::with_capacity(width * height);

    for y in (0..height).rev() {
        for x in 0..width {
            let owner = territories[y * width + x];
            let value = match owner {
                Some(Color::Black) => 1.0,
                Some(Color::White) => -1.0,
                None => 0.0,
            };

            values.push(if mover == Color::Black { value } else { -value });
        }
    }

    values
}

fn kata_candidates_to_string(
    candidates: &[Candidate],
    height: usize,
    width: usize,
    territories: &[Option<Color>],
    score_lead: f32,
) -> String {
    let moves = candidates
        .iter()
        .enumerate()
        .map(|(order, c)| {
            format!(
                "info move {} visits {} winrate {:.4} lcb {:.4} prior {:.4} order {} pv {}",
                point_to_vertex(c.point, height),
                c.visits,
                c.win_chance(),
                c.win_chance_lcb(),
                c.policy,
                order,
                pv_to_string(&c.variations, height),
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    let visits: usize = candidates.iter().map(|c| c.visits).sum();
    let ownership = ownership_floats(territories, width, height, candidates[0].color)
        .into_iter()
        .map(|v| format!("{:.2}", v))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{} rootInfo winrate {:.4} visits {} scoreLead {:.1} ownership {}",
        moves,
        candidates[0].win_chance(),
        visits,
        score_lead,
        ownership,
    )
}

/// The 63-character alphabet a CGOS `ownership` string quantizes each
/// point's signed ownership into (§6.3 `ownership`).
const OWNERSHIP_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+";

fn cgos_candidates_to_string(
    candidates: &[Candidate],
    height: usize,
    width: usize,
    territories: &[Option<Color>],
    score: f32,
) -> String {
    let moves: Vec<String> = candidates
        .iter()
        .map(|c| {
            format!(
                "{{\"move\":\"{}\",\"visits\":{},\"winrate\":{:.4},\"prior\":{:.4},\"pv\":\"{}\"}}",
                point_to_vertex(c.point, height),
                c.visits,
                c.win_chance(),
                c.policy,
                pv_to_string(&c.variations, height),
            )
        })
        .collect();

    let visits: usize = candidates.iter().map(|c| c.visits).sum();
    let ownership: String = ownership_floats(territories, width, height, candidates[0].color)
        .into_iter()
        .map(|v| {
            let bucket = (((v + 1.0) / 2.0).clamp(0.0, 1.0) * 62.0).round() as usize;
            OWNERSHIP_ALPHABET.chars().nth(bucket).unwrap_or('+')
        })
        .collect();

    format!(
        "{{\"winrate\":{:.4},\"score\":{:.1},\"visits\":{},\"moves\":[{}],\"ownership\":\"{}\"}}",
        candidates[0].win_chance(),
        score,
        visits,
        moves.join(","),
        ownership,
    )
}

struct History {
    point: Point,
    color: Color,
}

/// Reads GTP commands from `reader` and writes responses to `writer` until
/// `quit` is received or the input stream ends (§4 `run`).
pub struct GtpEngine<R, W> {
    reader: R,
    writer: W,
    processor: Arc<Processor>,
    player: Player,
    komi: f32,
    rule: Rule,
    timelimit: f64,
    /// Remaining clock time per color, indexed by `color_index` (§4.5
    /// `time_settings`/`time_left`). `-1.0` means untimed.
    remaining_times: [f64; 2],
    resign_threshold: f32,
    resign_score: f32,
    resign_turn: usize,
    history: Vec<History>,
    started_at: Instant,
}

impl<R: BufRead + Send, W: Write> GtpEngine<R, W> {
    pub fn new(reader: R, writer: W, processor: Arc<Processor>) -> Self {
        let width = dg_go::DEFAULT_SIZE;
        let height = dg_go::DEFAULT_SIZE;
        let komi = dg_go::DEFAULT_KOMI;
        let rule = Rule::Chinese;
        let player = Player::new(width, height, komi, rule, Arc::clone(&processor)).expect("default board is valid");

        Self {
            reader,
            writer,
            processor,
            player,
            komi,
            rule,
            timelimit: *dg_utils::config::TIME_LIMIT,
            remaining_times: [-1.0, -1.0],
            resign_threshold: *dg_utils::config::RESIGN_THRESHOLD,
            resign_score: *dg_utils::config::RESIGN_SCORE,
            resign_turn: *dg_utils::config::RESIGN_TURN,
            history: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Replaces the current position with the mainline of the SGF record at
    /// `path`, so the engine can be resumed mid-game (§8 `load`).
    pub fn load(&mut self, path: &str) -> Result<(), String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let record = Record::parse(&text).map_err(|e| e.to_string())?;

        self.komi = record.komi;
        self.rule = record.rule;

        let mut player = Player::new(record.width, record.height, record.komi, record.rule, Arc::clone(&self.processor))
            .map_err(|e| e.to_string())?;
        player.load_setup(&record.setup_black, &record.setup_white);

        let mut history = Vec::with_capacity(record.moves.len());
        for &(color, point) in &record.moves {
            player.play(point, color).map_err(|e| e.to_string())?;
            history.push(History { point, color });
        }

        self.player = player;
        self.history = history;

        Ok(())
    }

    fn remaining_time(&self, color: Color) -> f64 {
        self.remaining_times[color_index(color)]
    }

    /// The main command loop (§4 `run`). Stops on `quit` or end-of-input.
    /// `lz-analyze`/`kata-analyze`/`cgos-analyze` are handled outside of
    /// `dispatch`, since they stream multiple responses and must notice a
    /// subsequent command arriving mid-search (§4.5 "Streaming commands").
    pub fn run(&mut self) {
        let mut pending = None;

        loop {
            let line = match pending.take() {
                Some(line) => line,
                None => {
                    let mut line = String::new();
                    match self.reader.read_line(&mut line) {
                        Ok(0) => break,
                        Ok(_) => line,
                        Err(_) => break,
                    }
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (id, rest) = parse_id(line);
            let mut parts = rest.split_whitespace();
            let Some(command) = parts.next() else { continue };
            let args: Vec<&str> = parts.collect();

            if matches!(command, "lz-analyze" | "kata-analyze" | "cgos-analyze") {
                let format = match command {
                    "lz-analyze" => Format::LeelaZero,
                    "kata-analyze" => Format::KataGo,
                    _ => Format::Cgos,
                };

                pending = self.run_streaming_analyze(id, &args, format);
                continue;
            }

            let quit = command == "quit";
            match self.dispatch(command, &args) {
                Ok(message) => self.respond(id, true, &message),
                Err(message) => self.respond(id, false, &message),
            }

            if quit {
                break;
            }
        }
    }

    /// Runs `lz-analyze`/`kata-analyze`/`cgos-analyze`: repeatedly searches
    /// for `interval` seconds and writes one `info`/JSON line per iteration,
    /// until a subsequent line arrives on `self.reader` and cancels the
    /// stream. That line is returned so `run`'s loop can dispatch it
    /// immediately instead of blocking on the reader again (§4.5 "Streaming
    /// commands", grounded on `gtp.py`'s `_perform`/`terminated` loop).
    fn run_streaming_analyze(&mut self, id: Option<u32>, args: &[&str], format: Format) -> Option<String> {
        let color = args.iter().find_map(|a| color_from_str(a)).unwrap_or_else(|| self.player.board().to_move());
        let interval = args
            .iter()
            .find_map(|a| a.parse::<f64>().ok())
            .map(|centiseconds| (centiseconds / 100.0).max(0.05))
            .unwrap_or(1.0);
        let remaining = self.remaining_time(color);

        let prefix = format!("={} ", id.map(|i| i.to_string()).unwrap_or_default());
        let _ = write!(self.writer, "{}", prefix);
        let _ = self.writer.flush();

        let reader = &mut self.reader;
        let player = &self.player;
        let writer = &mut self.writer;

        let next_line = std::thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<Option<String>>();

            scope.spawn(move || {
                let mut line = String::new();
                let next = match reader.read_line(&mut line) {
                    Ok(0) => None,
                    Ok(_) => Some(line),
                    Err(_) => None,
                };
                let _ = tx.send(next);
            });

            loop {
                if let Ok(next) = rx.try_recv() {
                    break next;
                }

                let candidates = player.evaluate(None, interval, remaining, false, Criterion::Lcb);
                let height = player.board().height();
                let width = player.board().width();

                let line = match format {
                    Format::LeelaZero => lz_candidates_to_string(&candidates, height),
                    Format::KataGo => {
                        let territories = player.get_territories();
                        let (black, white) = player.get_final_score();
                        let score = if color == Color::Black { black - white } else { white - black };
                        kata_candidates_to_string(&candidates, height, width, &territories, score)
                    }
                    Format::Cgos => {
                        let territories = player.get_territories();
                        let (black, white) = player.get_final_score();
                        let score = if color == Color::Black { black - white } else { white - black };
                        cgos_candidates_to_string(&candidates, height, width, &territories, score)
                    }
                };

                let _ = write!(writer, "\n{}", line);
                let _ = writer.flush();
            }
        });

        let _ = write!(self.writer, "\n\n");
        let _ = self.writer.flush();

        next_line
    }

    fn respond(&mut self, id: Option<u32>, ok: bool, message: &str) {
        let prefix = if ok { "=" } else { "?" };
        let id_str = id.map(|i| i.to_string()).unwrap_or_default();

        let _ = write!(self.writer, "{}{} {}\n\n", prefix, id_str, message);
        let _ = self.writer.flush();
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "protocol_version" => Ok(PROTOCOL_VERSION.to_string()),
            "name" => Ok(NAME.to_string()),
            "version" => Ok(VERSION.to_string()),
            "known_command" => {
                let known = args.first().map(|a| KNOWN_COMMANDS.contains(a)).unwrap_or(false);
                Ok(if known { "true".to_string() } else { "false".to_string() })
            }
            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),
            "quit" => Ok(String::new()),
            "boardsize" => self.cmd_boardsize(args),
            "clear_board" => self.cmd_clear_board(),
            "fixed_handicap" => self.cmd_fixed_handicap(args),
            "komi" => self.cmd_komi(args),
            "play" => self.cmd_play(args),
            "genmove" => self.cmd_genmove(args, false),
            "reg_genmove" => self.cmd_genmove(args, true),
            "undo" => self.cmd_undo(),
            "showboard" => Ok(format!("{}", self.player.board())),
            "time_settings" => self.cmd_time_settings(args),
            "time_left" => self.cmd_time_left(args),
            "final_score" => self.cmd_final_score(),
            "final_status_list" => self.cmd_final_status_list(args),
            "lz-genmove_analyze" => self.cmd_genmove_analyze(args, Format::LeelaZero),
            "kata-genmove_analyze" => self.cmd_genmove_analyze(args, Format::KataGo),
            "cgos-genmove_analyze" => self.cmd_genmove_analyze(args, Format::Cgos),
            "lz-analyze" | "kata-analyze" | "cgos-analyze" => {
                // Handled directly by `run`, which streams responses and
                // watches for a cancelling command; `dispatch` only sees
                // these names via `known_command`/`list_commands`.
                Err("must be run through the top-level command loop".to_string())
            }
            "gogui-analyze_commands" => Ok(GOGUI_ANALYZE_COMMANDS.to_string()),
            "gogui-analyze_territory" => Ok(self.cmd_gogui_analyze_territory()),
            "gogui-analyze_values" => Ok(self.cmd_gogui_analyze_values()),
            "gogui-analyze_value" => Ok(self.cmd_gogui_analyze_value()),
            "cputime" => Ok(format!("{:.3}", self.started_at.elapsed().as_secs_f64())),
            "kgs-rules" => self.cmd_kgs_rules(args),
            "help" => Ok(KNOWN_COMMANDS.join("\n")),
            _ => Err(format!("unknown command: {}", command)),
        }
    }

    fn cmd_boardsize(&mut self, args: &[&str]) -> Result<String, String> {
        let size: usize = args.first().and_then(|a| a.parse().ok()).ok_or("invalid size")?;
        if size == 0 || size > dg_go::MODEL_SIZE {
            return Err("unacceptable size".to_string());
        }

        self.player = Player::new(size, size, self.komi, self.rule, Arc::clone(&self.processor))
            .map_err(|e| e.to_string())?;
        self.history.clear();

        Ok(String::new())
    }

    fn cmd_clear_board(&mut self) -> Result<String, String> {
        let (width, height) = (self.player.board().width(), self.player.board().height());
        self.player = Player::new(width, height, self.komi, self.rule, Arc::clone(&self.processor))
            .map_err(|e| e.to_string())?;
        self.history.clear();

        Ok(String::new())
    }

    /// Places star-point handicap stones for Black and hands the move to
    /// White, returning the vertices chosen (§4.5 `fixed_handicap`).
    fn cmd_fixed_handicap(&mut self, args: &[&str]) -> Result<String, String> {
        let handicap: usize = args.first().and_then(|a| a.parse().ok()).ok_or("invalid handicap")?;
        if !(2..=9).contains(&handicap) {
            return Err("invalid handicap".to_string());
        }

        let height = self.player.board().height();
        let points = dg_go::get_handicap_positions(self.player.board().width(), height, handicap);

        self.player.set_handicap(handicap);
        self.history.clear();

        Ok(points.into_iter().map(|p| point_to_vertex(p, height)).collect::<Vec<_>>().join(" "))
    }

    fn cmd_komi(&mut self, args: &[&str]) -> Result<String, String> {
        let komi: f32 = args.first().and_then(|a| a.parse().ok()).ok_or("invalid komi")?;
        self.komi = komi;

        let (width, height) = (self.player.board().width(), self.player.board().height());
        let mut player = Player::new(width, height, komi, self.rule, Arc::clone(&self.processor))
            .map_err(|e| e.to_string())?;

        for mv in &self.history {
            player.play(mv.point, mv.color).map_err(|e| e.to_string())?;
        }
        self.player = player;

        Ok(String::new())
    }

    /// Sets the scoring rule, following the de-facto GTP extension used by
    /// the KGS Go Server (`kgs-rules japanese|chinese|aga`). `aga` is scored
    /// the same way this engine treats `Chinese`.
    fn cmd_kgs_rules(&mut self, args: &[&str]) -> Result<String, String> {
        let rule = match args.first().map(|a| a.to_ascii_lowercase()) {
            Some(ref name) if name == "japanese" => Rule::Japanese,
            Some(ref name) if name == "chinese" || name == "aga" => Rule::Chinese,
            Some(ref name) if name == "computer" => Rule::Computer,
            _ => return Err("unsupported rules".to_string()),
        };
        self.rule = rule;

        let (width, height) = (self.player.board().width(), self.player.board().height());
        let mut player = Player::new(width, height, self.komi, rule, Arc::clone(&self.processor))
            .map_err(|e| e.to_string())?;

        for mv in &self.history {
            player.play(mv.point, mv.color).map_err(|e| e.to_string())?;
        }
        self.player = player;

        Ok(String::new())
    }

    fn cmd_play(&mut self, args: &[&str]) -> Result<String, String> {
        if args.len() < 2 {
            return Err("play requires a color and a vertex".to_string());
        }

        let color = color_from_str(args[0]).ok_or("invalid color")?;
        if args[1].eq_ignore_ascii_case("resign") {
            return Ok(String::new());
        }

        let point = vertex_to_point(args[1]).ok_or("invalid vertex")?;
        self.player.play(point, color).map_err(|e| e.to_string())?;
        self.history.push(History { point, color });

        Ok(String::new())
    }

    fn cmd_undo(&mut self) -> Result<String, String> {
        if self.history.pop().is_none() {
            return Err("cannot undo".to_string());
        }

        let (width, height) = (self.player.board().width(), self.player.board().height());
        let mut player = Player::new(width, height, self.komi, self.rule, Arc::clone(&self.processor))
            .map_err(|e| e.to_string())?;

        for mv in &self.history {
            player.play(mv.point, mv.color).map_err(|e| e.to_string())?;
        }
        self.player = player;

        Ok(String::new())
    }

    fn cmd_time_settings(&mut self, args: &[&str]) -> Result<String, String> {
        let main_time: f64 = args.first().and_then(|a| a.parse().ok()).ok_or("invalid time_settings")?;
        let remaining = if main_time > 0.0 { main_time } else { -1.0 };
        self.remaining_times = [remaining, remaining];

        Ok(String::new())
    }

    /// Updates one color's remaining clock time, as reported by the
    /// controller between moves (§4.5 `time_left`).
    fn cmd_time_left(&mut self, args: &[&str]) -> Result<String, String> {
        if args.len() < 2 {
            return Err("time_left requires a color and a remaining time".to_string());
        }

        let color = color_from_str(args[0]).ok_or("invalid color")?;
        let remaining: f64 = args[1].parse().map_err(|_| "invalid time_left".to_string())?;
        self.remaining_times[color_index(color)] = remaining;

        Ok(String::new())
    }

    fn genmove_color(&self, args: &[&str]) -> Result<Color, String> {
        args.first().and_then(|a| color_from_str(a)).ok_or_else(|| "invalid color".to_string())
    }

    fn cmd_genmove(&mut self, args: &[&str], register_only: bool) -> Result<String, String> {
        let color = self.genmove_color(args)?;

        let point = if self.history.len() < *dg_utils::config::INITIAL_TURN {
            self.player.get_random(color, true)
        } else {
            let candidates = self.player.evaluate(None, self.timelimit, self.remaining_time(color), false, Criterion::Lcb);
            let best = &candidates[0];

            if self.history.len() >= self.resign_turn
                && best.win_chance() < self.resign_threshold
                && self.get_score_margin().abs() >= self.resign_score
            {
                return Ok("resign".to_string());
            }

            self.maybe_autopass(best.point, color)
        };

        if !register_only {
            self.player.play(point, color).map_err(|e| e.to_string())?;
            self.history.push(History { point, color });
        }

        Ok(point_to_vertex(point, self.player.board().height()))
    }

    fn get_score_margin(&self) -> f32 {
        let (black, white) = self.player.get_final_score();
        black - white
    }

    /// Under the `Japanese` rule, `pass` is only accepted once the boundary
    /// between territories is settled; otherwise the engine keeps playing
    /// its best move even if search ranked `pass` first (§4.5 "auto-pass").
    fn maybe_autopass(&self, point: Point, color: Color) -> Point {
        if !point.is_pass() || self.rule != Rule::Japanese {
            return point;
        }

        if self.is_boundary_settled() {
            point
        } else {
            self.player
                .board()
                .enabled_moves(color)
                .into_iter()
                .next()
                .unwrap_or(Point::pass())
        }
    }

    fn is_boundary_settled(&self) -> bool {
        let board = self.player.board();
        let owners = self.player.get_territories();

        for (point, occupant) in board.colors() {
            if occupant.is_some() {
                continue;
            }

            let index = point.y() as usize * board.width() + point.x() as usize;
            let owner = owners[index];

            for n in point.neighbours() {
                if !n.is_on_board(board.width(), board.height()) {
                    continue;
                }
                if board.at(n).is_none() {
                    let n_index = n.y() as usize * board.width() + n.x() as usize;
                    if owners[n_index] != owner {
                        return false;
                    }
                }
            }
        }

        true
    }

    fn cmd_final_score(&mut self) -> Result<String, String> {
        let (black, white) = self.player.get_final_score();
        let diff = black - white;

        Ok(if diff > 0.0 {
            format!("B+{:.1}", diff)
        } else if diff < 0.0 {
            format!("W+{:.1}", -diff)
        } else {
            "0".to_string()
        })
    }

    fn cmd_final_status_list(&mut self, args: &[&str]) -> Result<String, String> {
        let status = args.first().copied().unwrap_or("alive");
        let board = self.player.board();
        let height = board.height();

        let vertices: Vec<String> = match status {
            "dead" => Vec::new(),
            _ => board
                .colors()
                .filter(|(_, occupant)| occupant.is_some())
                .map(|(p, _)| point_to_vertex(p, height))
                .collect(),
        };

        Ok(vertices.join(" "))
    }

    /// `*-genmove_analyze`: a single full-strength search, one analysis
    /// line, and the move it recommends actually played (§4.5
    /// "`*-genmove_analyze`"). Unlike the plain `*-analyze` commands this
    /// does not stream or loop.
    fn cmd_genmove_analyze(&mut self, args: &[&str], format: Format) -> Result<String, String> {
        let color = args.iter().find_map(|a| color_from_str(a)).unwrap_or_else(|| self.player.board().to_move());

        let candidates = if self.history.len() < *dg_utils::config::INITIAL_TURN {
            let point = self.player.get_random(color, true);
            vec![Candidate { point, color, visits: 1, value: 0.0, policy: 1.0, variations: vec![point] }]
        } else {
            self.player.evaluate(None, self.timelimit, self.remaining_time(color), false, Criterion::Lcb)
        };
        let best = &candidates[0];

        let height = self.player.board().height();
        let width = self.player.board().width();
        let territories = self.player.get_territories();
        let (black, white) = self.player.get_final_score();
        let margin = if color == Color::Black { black - white } else { white - black };

        let analyze_line = match format {
            Format::LeelaZero => lz_candidates_to_string(&candidates, height),
            Format::KataGo => kata_candidates_to_string(&candidates, height, width, &territories, margin),
            Format::Cgos => cgos_candidates_to_string(&candidates, height, width, &territories, margin),
        };

        if self.history.len() >= self.resign_turn && best.win_chance() < self.resign_threshold && margin.abs() >= self.resign_score {
            return Ok(format!("\n{}\nplay resign", analyze_line));
        }

        let point = self.maybe_autopass(best.point, color);
        self.player.play(point, color).map_err(|e| e.to_string())?;
        self.history.push(History { point, color });

        Ok(format!("\n{}\nplay {}", analyze_line, point_to_vertex(point, height)))
    }

    /// A GoGui `gfx` board overlay: one row per board row (top to bottom),
    /// each point marked `B`, `W`, or `N` for neutral/dame (§3 `get_owners`).
    fn cmd_gogui_analyze_territory(&self) -> String {
        let board = self.player.board();
        let owners = self.player.get_territories();

        let mut rows = Vec::with_capacity(board.height());
        for y in (0..board.height()).rev() {
            let row: Vec<&str> = (0..board.width())
                .map(|x| match owners[y * board.width() + x] {
                    Some(Color::Black) => "B",
                    Some(Color::White) => "W",
                    None => "N",
                })
                .collect();
            rows.push(row.join(" "));
        }

        rows.join("\n")
    }

    /// A GoGui `gfx` heatmap: one `#rrggbb` color per point, green for Black
    /// favouring candidates and red for White favouring ones, scaled by
    /// `win_chance` (§3 `Candidate`).
    fn cmd_gogui_analyze_values(&mut self) -> String {
        let color = self.player.board().to_move();
        let candidates = self.player.evaluate(None, self.timelimit, self.remaining_time(color), false, Criterion::Lcb);
        let height = self.player.board().height();

        candidates
            .iter()
            .map(|c| {
                let green = (c.win_chance() * 255.0).round().clamp(0.0, 255.0) as u8;
                let red = 255 - green;

                format!("{} #{:02x}{:02x}00", point_to_vertex(c.point, height), red, green)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A single bare float: the root's current win chance, for GoGui's
    /// scalar-value display widget.
    fn cmd_gogui_analyze_value(&mut self) -> String {
        let color = self.player.board().to_move();
        let candidates = self.player.evaluate(None, self.timelimit, self.remaining_time(color), false, Criterion::Lcb);

        format!("{:.4}", candidates[0].win_chance())
    }
}

#[derive(Clone, Copy)]
enum Format {
    LeelaZero,
    KataGo,
    Cgos,
}

fn parse_id(line: &str) -> (Option<u32>, &str) {
    lazy_static! {
        static ref ID: Regex = Regex::new(r"^(\d+)\s*(.*)$").unwrap();
    }

    if let Some(caps) = ID.captures(line) {
        let id = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        (id, rest)
    } else {
        (None, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_round_trips() {
        let p = Point::new(3, 3);
        let text = point_to_vertex(p, 19);

        assert_eq!(vertex_to_point(&text), Some(p));
    }

    #[test]
    fn vertex_skips_the_letter_i() {
        assert_eq!(point_to_vertex(Point::new(8, 0), 19), "J1");
    }

    #[test]
    fn parses_a_command_with_an_id() {
        let (id, rest) = parse_id("7 genmove black");

        assert_eq!(id, Some(7));
        assert_eq!(rest, "genmove black");
    }

    #[test]
    fn parses_a_command_without_an_id() {
        let (id, rest) = parse_id("genmove black");

        assert_eq!(id, None);
        assert_eq!(rest, "genmove black");
    }

    #[test]
    fn protocol_commands_round_trip_through_run() {
        use std::io::Cursor;

        let input = b"name\nversion\nquit\n".to_vec();
        let processor = Arc::new(Processor::new(Arc::new(dg_nn::RandomModel::new())));
        let mut output = Vec::new();

        {
            let mut engine = GtpEngine::new(Cursor::new(input), &mut output, processor);
            engine.run();
        }

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("= dream_go"));
    }
}
