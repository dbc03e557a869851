//! Leaderboard metric catalog.
//!
//! Every metric the bot knows maps a stable key (`pvp_kills`) to the API group and sort
//! column used to request its clan table, plus a human label for embeds. Clan tables are
//! fetched for every entry on each poll cycle.

use std::fmt;

/// One leaderboard metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    /// Stable key used in history rows, leader snapshots and embeds.
    pub key: &'static str,
    /// API `group` parameter.
    pub group: &'static str,
    /// API `sortBy` parameter, also the stat name inside entries.
    pub sort_by: &'static str,
    pub label: &'static str,
}

impl Metric {
    const fn new(
        key: &'static str,
        group: &'static str,
        sort_by: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            key,
            group,
            sort_by,
            label,
        }
    }

    /// Identifies this metric's stat inside its group.
    pub fn id(&self) -> MetricId {
        MetricId::new(self.group, self.sort_by)
    }
}

/// A stat within a leaderboard group, e.g. (`pvp`, `kill_player`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricId {
    pub group: String,
    pub stat: String,
}

impl MetricId {
    pub fn new(group: impl Into<String>, stat: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            stat: stat.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.stat)
    }
}

/// PvP kills, also the table used for player lookups.
pub const PVP_KILLS: Metric = Metric::new("pvp_kills", "pvp", "kill_player", "PvP Kills");

pub const METRICS: &[Metric] = &[
    PVP_KILLS,
    Metric::new("pvp_deaths", "pvp", "death_player", "PvP Deaths"),

    Metric::new("pve_sharks", "pve", "killed_shark", "Sharks Killed"),
    Metric::new("pve_chickens", "pve", "killed_chicken", "Chickens Killed"),
    Metric::new("pve_patrol_heli", "pve", "killed_patrolheli", "Patrol Helicopters Killed"),
    Metric::new("pve_bradleys", "pve", "killed_bradley", "Bradleys Killed"),
    Metric::new("pve_scientists", "pve", "killed_scientist", "Scientists Killed"),
    Metric::new("pve_tunnel_dwellers", "pve", "killed_tunneldweller", "Tunnel Dwellers Killed"),
    Metric::new("pve_bears", "pve", "killed_bear", "Bears Killed"),
    Metric::new("pve_deer", "pve", "killed_deer", "Deer Killed"),
    Metric::new("pve_polar_bears", "pve", "killed_polarbear", "Polar Bears Killed"),
    Metric::new("pve_boars", "pve", "killed_boar", "Boars Killed"),
    Metric::new("pve_wolves", "pve", "killed_wolf", "Wolves Killed"),
    Metric::new("pve_underwater_dwellers", "pve", "killed_underwaterdweller", "Underwater Dwellers Killed"),

    Metric::new("gambling_poker_won", "gambling", "gambling_pokerwon", "Poker Winnings"),
    Metric::new("gambling_poker_deposited", "gambling", "gambling_pokerdeposited", "Poker Deposited"),
    Metric::new("gambling_slot_won", "gambling", "gambling_slotwon", "Slots Winnings"),
    Metric::new("gambling_slot_deposited", "gambling", "gambling_slotdeposited", "Slots Deposited"),
    Metric::new("gambling_wheel_won", "gambling", "gambling_wheelwon", "Wheel Winnings"),
    Metric::new("gambling_wheel_deposited", "gambling", "gambling_wheeldeposited", "Wheel Deposited"),
    Metric::new("gambling_blackjack_deposited", "gambling", "gambling_blackjackdeposited", "Blackjack Deposited"),
    Metric::new("gambling_blackjack_won", "gambling", "gambling_blackjackwon", "Blackjack Winnings"),

    Metric::new("looted_oil_barrels", "looted", "looted_oilbarrel", "Oil Barrels Looted"),
    Metric::new("looted_crates", "looted", "looted_crate", "Crates Looted"),
    Metric::new("looted_hackable", "looted", "looted_hackablecrate", "Hackable Crates Looted"),
    Metric::new("looted_barrels", "looted", "looted_barrel", "Barrels Looted"),
    Metric::new("looted_bradley_crates", "looted", "looted_bradleycrate", "Bradley Crates Looted"),
    Metric::new("looted_heli_crates", "looted", "looted_helicrate", "Heli Crates Looted"),
    Metric::new("looted_supply_drops", "looted", "looted_supplydrop", "Supply Drops Looted"),
    Metric::new("looted_elite_crates", "looted", "looted_elitecrate", "Elite Crates Looted"),

    Metric::new("build_foundation", "building", "build_foundation", "Foundations Built"),
    Metric::new("build_foundation_triangle", "building", "build_foundation.triangle", "Triangle Foundations Built"),
    Metric::new("build_floor_triangle", "building", "build_floor.triangle", "Triangle Floors Built"),
    Metric::new("build_floor", "building", "build_floor", "Floors Built"),
    Metric::new("build_foundation_steps", "building", "build_foundation.steps", "Foundation Steps Built"),
    Metric::new("build_floor_frame", "building", "build_floor.frame", "Floor Frames Built"),
    Metric::new("build_floor_triangle_frame", "building", "build_floor.triangle.frame", "Triangle Floor Frames Built"),
    Metric::new("build_wall_low", "building", "build_wall.low", "Low Walls Built"),
    Metric::new("build_wall", "building", "build_wall", "Walls Built"),
    Metric::new("build_wall_window", "building", "build_wall.window", "Window Walls Built"),
    Metric::new("build_wall_half", "building", "build_wall.half", "Half Walls Built"),
    Metric::new("build_wall_frame", "building", "build_wall.frame", "Wall Frames Built"),
    Metric::new("build_wall_doorway", "building", "build_wall.doorway", "Doorways Built"),
    Metric::new("build_stairs_spiral", "building", "build_stairs.spiral", "Spiral Stairs Built"),
    Metric::new("build_stairs_u", "building", "build_stairs.u", "U Stairs Built"),
    Metric::new("build_stairs_spiral_triangle", "building", "build_stairs.spiral.triangle", "Spiral Triangle Stairs Built"),
    Metric::new("build_stairs_l", "building", "build_stairs.l", "L Stairs Built"),
    Metric::new("build_roof", "building", "build_roof", "Roofs Built"),
    Metric::new("build_roof_triangle", "building", "build_roof.triangle", "Triangle Roofs Built"),
    Metric::new("build_ramp", "building", "build_ramp", "Ramps Built"),

    Metric::new("placed_external_stone_gate", "item_placed", "build_gates.external.high.stone", "Stone External Gates Placed"),
    Metric::new("placed_sleeping_bags", "item_placed", "build_sleepingbag_leather_deployed", "Sleeping Bags Placed"),
    Metric::new("placed_beds", "item_placed", "build_bed_deployed", "Beds Placed"),
    Metric::new("placed_lockers", "item_placed", "build_locker.deployed", "Lockers Placed"),
    Metric::new("placed_gun_traps", "item_placed", "build_guntrap.deployed", "Gun Traps Placed"),
    Metric::new("placed_tc", "item_placed", "build_cupboard.tool.deployed", "Tool Cupboards Placed"),
    Metric::new("placed_vending_machines", "item_placed", "build_vendingmachine.deployed", "Vending Machines Placed"),
    Metric::new("placed_small_wood_boxes", "item_placed", "build_woodbox_deployed", "Small Wood Boxes Placed"),
    Metric::new("placed_flame_turrets", "item_placed", "build_flameturret.deployed", "Flame Turrets Placed"),
    Metric::new("placed_sam_sites", "item_placed", "build_sam_site_turret_deployed", "SAM Sites Placed"),
    Metric::new("placed_furnaces", "item_placed", "build_furnace", "Furnaces Placed"),
    Metric::new("placed_large_furnaces", "item_placed", "build_furnace.large", "Large Furnaces Placed"),
    Metric::new("placed_external_ice_walls", "item_placed", "build_wall.external.high.ice", "High External Ice Walls Placed"),
    Metric::new("placed_external_stone_walls", "item_placed", "build_wall.external.high.stone", "High External Stone Walls Placed"),
    Metric::new("placed_external_wood_walls", "item_placed", "build_wall.external.high.wood", "High External Wood Walls Placed"),
    Metric::new("placed_large_wood_boxes", "item_placed", "build_box.wooden.large", "Large Wood Boxes Placed"),
    Metric::new("placed_external_wood_gates", "item_placed", "build_gates.external.high.wood", "Wood External Gates Placed"),

    Metric::new("recycled_propanetanks", "recycled", "recycled_propanetank", "Propane Tanks Recycled"),
    Metric::new("recycled_techparts", "recycled", "recycled_techparts", "Tech Trash Recycled"),
    Metric::new("recycled_smg_bodies", "recycled", "recycled_smgbody", "SMG Bodies Recycled"),
    Metric::new("recycled_metal_blades", "recycled", "recycled_metalblade", "Metal Blades Recycled"),
    Metric::new("recycled_fuses", "recycled", "recycled_fuse", "Fuses Recycled"),
    Metric::new("recycled_sheet_metal", "recycled", "recycled_sheetmetal", "Sheet Metal Recycled"),
    Metric::new("recycled_rope", "recycled", "recycled_rope", "Rope Recycled"),
    Metric::new("recycled_tarp", "recycled", "recycled_tarp", "Tarp Recycled"),
    Metric::new("recycled_sewing_kits", "recycled", "recycled_sewingkit", "Sewing Kits Recycled"),
    Metric::new("recycled_roadsigns", "recycled", "recycled_roadsigns", "Road Signs Recycled"),
    Metric::new("recycled_metal_springs", "recycled", "recycled_metalspring", "Metal Springs Recycled"),
    Metric::new("recycled_semi_bodies", "recycled", "recycled_semibody", "Semi Bodies Recycled"),
    Metric::new("recycled_rifle_bodies", "recycled", "recycled_riflebody", "Rifle Bodies Recycled"),
    Metric::new("recycled_metal_pipes", "recycled", "recycled_metalpipe", "Metal Pipes Recycled"),
    Metric::new("recycled_gears", "recycled", "recycled_gears", "Gears Recycled"),

    Metric::new("gathered_metal_ore", "gathered", "gathered_metal.ore", "Metal Ore Gathered"),
    Metric::new("gathered_cactus_flesh", "gathered", "gathered_cactusflesh", "Cactus Flesh Gathered"),
    Metric::new("gathered_cloth", "gathered", "gathered_cloth", "Cloth Gathered"),
    Metric::new("gathered_sulfur_ore", "gathered", "gathered_sulfur.ore", "Sulfur Ore Gathered"),
    Metric::new("gathered_hqm_ore", "gathered", "gathered_hq.metal.ore", "HQM Ore Gathered"),
    Metric::new("gathered_animal_fat", "gathered", "gathered_fat.animal", "Animal Fat Gathered"),
    Metric::new("gathered_leather", "gathered", "gathered_leather", "Leather Gathered"),
    Metric::new("gathered_wood", "gathered", "gathered_wood", "Wood Gathered"),
    Metric::new("gathered_stone", "gathered", "gathered_stones", "Stone Gathered"),

    Metric::new("boom_rocket_hv", "boom", "shot_ammo.rocket.hv", "HV Rockets Fired"),
    Metric::new("boom_rocket_fire", "boom", "shot_ammo.rocket.fire", "Fire Rockets Fired"),
    Metric::new("boom_rocket_basic", "boom", "shot_ammo.rocket.basic", "Rockets Fired"),
    Metric::new("boom_beancan", "boom", "thrown_grenade.beancan", "Beancan Grenades Thrown"),
    Metric::new("boom_f1", "boom", "thrown_grenade.f1", "F1 Grenades Thrown"),
    Metric::new("boom_flashbang", "boom", "thrown_grenade.flashbang", "Flashbangs Thrown"),
    Metric::new("boom_molotov", "boom", "thrown_grenade.molotov", "Molotovs Thrown"),
    Metric::new("boom_satchel", "boom", "thrown_explosive.satchel", "Satchels Thrown"),
    Metric::new("boom_smoke_grenade", "boom", "thrown_grenade.smoke", "Smoke Grenades Thrown"),
    Metric::new("boom_catapult_incendiary", "boom", "explode_catapult.ammo.incendiary", "Catapult Incendiary Ammo"),
    Metric::new("boom_catapult_boulder", "boom", "explode_catapult.ammo.boulder", "Catapult Boulder Ammo"),
    Metric::new("boom_catapult_explosive", "boom", "explode_catapult.ammo.explosive", "Catapult Explosive Ammo"),
    Metric::new("boom_c4", "boom", "thrown_explosive.timed", "Timed Explosives Thrown"),
    Metric::new("boom_gl_he", "boom", "shot_ammo.grenadelauncher.he", "GL HE Rounds Fired"),
    Metric::new("boom_gl_smoke", "boom", "shot_ammo.grenadelauncher.smoke", "GL Smoke Rounds Fired"),
    Metric::new("boom_explosive_rifle", "boom", "shot_ammo.rifle.explosive", "Explosive Rifle Rounds Fired"),
];

/// Metrics shown in the leaderboard embed.
pub const DISPLAY_METRICS: &[&str] = &[
    "pvp_kills",
    "looted_hackable",
    "gathered_sulfur_ore",
    "boom_rocket_basic",
    "looted_bradley_crates",
];

/// Metrics shown in the 12-hour trend embed.
pub const TREND_METRICS: &[&str] = DISPLAY_METRICS;

/// Minimum increase between cycles that counts as a spike for a top clan.
pub const SPIKE_THRESHOLDS: &[(&str, f64)] = &[
    ("gathered_sulfur_ore", 5000.0),
    ("looted_hackable", 2.0),
    ("boom_rocket_basic", 50.0),
    ("looted_bradley_crates", 2.0),
];

/// Number of top clans recorded per metric for history and spike checks.
pub const TREND_TOP_N: usize = 5;

/// Looks up a catalog metric by key.
pub fn find(key: &str) -> Option<&'static Metric> {
    METRICS.iter().find(|m| m.key == key)
}

/// Looks up the catalog metric whose table is sorted by the given stat.
pub fn find_by_id(id: &MetricId) -> Option<&'static Metric> {
    METRICS
        .iter()
        .find(|m| m.group == id.group && m.sort_by == id.stat)
}

pub fn spike_threshold(key: &str) -> Option<f64> {
    SPIKE_THRESHOLDS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, threshold)| *threshold)
}

/// Whether top-clan history is recorded for the metric.
pub fn records_history(key: &str) -> bool {
    TREND_METRICS.contains(&key) || spike_threshold(key).is_some()
}

/// Whether a stat is a catalog counter.
///
/// Counters only grow during a wipe, so a drop means the round was reset. Other numeric
/// columns in a row (ratios such as `kdr`) move both ways and are never diffed.
pub fn is_counter(id: &MetricId) -> bool {
    find_by_id(id).is_some()
}

/// Distinct API groups in catalog order, each with the metric used to sort its player table.
pub fn groups() -> Vec<&'static Metric> {
    let mut seen: Vec<&'static Metric> = Vec::new();
    for metric in METRICS {
        if !seen.iter().any(|m| m.group == metric.group) {
            seen.push(metric);
        }
    }
    seen
}
