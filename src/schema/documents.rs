//! Built-in schemas of the five server documents.

use crate::document::DocumentKind;
use crate::schema::{
    DefaultValue as D, FieldKind as K, FieldSpec as F, ListSpec, RecordPolicy, RecordSpec,
    Schema, Shape, TextRule as R, Uniqueness, UnknownKeyPolicy,
};

/// Area names with a special meaning in reachability lists.
pub const ALL_AREAS: &str = "<ALL>";
pub const REACHABLE_AREAS: &str = "<REACHABLE_AREAS>";
pub const RESERVED_AREA_NAMES: &[&str] = &[ALL_AREAS, REACHABLE_AREAS];

const PORT: K = K::Integer { min: 1, max: 65_535 };
const COUNT: K = K::Integer { min: 0, max: i64::MAX };
const AMOUNT: K = K::Number { min: 0.0 };
const TEXT: K = K::Text(&[]);
const SECRET: K = K::Text(&[R::NonEmpty]);
const FLAG: K = K::Boolean;

static FLOODGUARD: RecordSpec = RecordSpec {
    fields: &[
        F::defaulted("times_per_interval", COUNT, D::Integer(1)),
        F::defaulted("interval_length", AMOUNT, D::Number(0.0)),
        F::defaulted("mute_length", AMOUNT, D::Number(0.0)),
    ],
    unknown_keys: RecordPolicy::Inherit,
    removed: &[],
};

static SETTINGS: RecordSpec = RecordSpec {
    fields: &[
        F::required("hostname", K::Text(&[R::NonEmpty])),
        F::required("port", PORT),
        F::required("playerlimit", COUNT),
        F::required("timeout", AMOUNT),
        F::required("local", FLAG),
        F::required("use_masterserver", FLAG),
        F::required("masterserver_name", TEXT),
        F::required("masterserver_description", TEXT),
        F::required("masterserver_ip", TEXT),
        F::required("announce_areas", FLAG),
        F::required("motd", TEXT),
        F::required("modpass", SECRET),
        F::required("cmpass", SECRET),
        F::required("gmpass", SECRET),
        F::optional("gmpass1", SECRET),
        F::optional("gmpass2", SECRET),
        F::optional("gmpass3", SECRET),
        F::optional("gmpass4", SECRET),
        F::optional("gmpass5", SECRET),
        F::optional("gmpass6", SECRET),
        F::optional("gmpass7", SECRET),
        F::defaulted("debug", FLAG, D::Bool(false)),
        F::optional("discord_link", TEXT),
        F::defaulted("utc_offset", TEXT, D::Text("local")),
        F::defaulted("max_numdice", COUNT, D::Integer(20)),
        F::defaulted("max_numfaces", COUNT, D::Integer(11_037)),
        F::defaulted("max_modifier_length", COUNT, D::Integer(12)),
        F::defaulted("max_acceptable_term", AMOUNT, D::Number(22_074.0)),
        F::defaulted("def_numdice", COUNT, D::Integer(1)),
        F::defaulted("def_numfaces", COUNT, D::Integer(6)),
        F::defaulted("def_modifier", TEXT, D::Text("")),
        F::defaulted("blackout_background", TEXT, D::Text("Blackout_HD")),
        F::defaulted("default_area_description", TEXT, D::Text("No description.")),
        F::defaulted("party_lights_timeout", AMOUNT, D::Number(10.0)),
        F::defaulted("showname_max_length", COUNT, D::Integer(30)),
        F::defaulted("sneak_handicap", AMOUNT, D::Number(5.0)),
        F::defaulted("spectator_name", TEXT, D::Text("SPECTATOR")),
        F::defaulted("music_change_floodguard", K::Record(&FLOODGUARD), D::EmptyRecord),
    ],
    unknown_keys: RecordPolicy::Inherit,
    removed: &[],
};

static BACKGROUNDS: ListSpec = ListSpec {
    item: K::Name(&[R::NonEmpty]),
    min_len: 1,
    unique: Uniqueness::Value,
};

static GIMP: ListSpec = ListSpec {
    item: K::Text(&[R::NonEmpty]),
    min_len: 1,
    unique: Uniqueness::None,
};

const AREA_NAME: K = K::Name(&[
    R::NonEmpty,
    R::NotReserved(RESERVED_AREA_NAMES),
    R::ProtocolSafe,
    R::NoRelativePath,
]);

static AREA: RecordSpec = RecordSpec {
    fields: &[
        F::required("name", AREA_NAME),
        F::required("background", K::Name(&[R::NonEmpty])),
        F::optional("description", TEXT),
        F::defaulted("bglock", FLAG, D::Bool(false)),
        F::defaulted("cbg_allowed", FLAG, D::Bool(false)),
        F::defaulted("locking_allowed", FLAG, D::Bool(false)),
        F::defaulted("private_area", FLAG, D::Bool(false)),
        F::defaulted("lobby_area", FLAG, D::Bool(false)),
        F::defaulted("has_lights", FLAG, D::Bool(true)),
        F::defaulted("iniswap_allowed", FLAG, D::Bool(false)),
        F::defaulted("global_allowed", FLAG, D::Bool(true)),
        F::defaulted("rollp_allowed", FLAG, D::Bool(true)),
        F::defaulted("song_switch_allowed", FLAG, D::Bool(false)),
        F::defaulted(
            "evidence_mod",
            K::Choice(&["FFA", "Mods", "CM", "HiddenCM"]),
            D::Text("FFA"),
        ),
        F::defaulted("afk_delay", K::Integer { min: 0, max: 360 }, D::Integer(0)),
        F::defaulted("afk_sendto", COUNT, D::Integer(0)),
        F::defaulted("reachable_areas", K::TextList(&[]), D::TextList(&[ALL_AREAS])),
        F::defaulted("visible_areas", K::TextList(&[]), D::TextList(&[REACHABLE_AREAS])),
        F::defaulted("scream_range", K::TextList(&[]), D::TextList(&[])),
        F::defaulted("restricted_chars", K::TextList(&[]), D::TextList(&[])),
        F::defaulted(
            "background_tod",
            K::TextMap {
                key_rules: &[R::NonEmpty, R::NoSpaces, R::NoPipe],
                value_rules: &[R::NoPipe],
            },
            D::EmptyMap,
        ),
    ],
    unknown_keys: RecordPolicy::Inherit,
    removed: &[(
        "sound_proof",
        "support for sound_proof was removed, use scream_range instead",
    )],
};

static AREAS: ListSpec = ListSpec {
    item: K::Record(&AREA),
    min_len: 1,
    unique: Uniqueness::Key("name"),
};

static TRACK: RecordSpec = RecordSpec {
    fields: &[
        F::required(
            "name",
            K::Name(&[R::NonEmpty, R::ProtocolSafe, R::NoRelativePath]),
        ),
        F::optional("length", K::Number { min: f64::NEG_INFINITY }),
        F::defaulted("source", K::Name(&[]), D::Text("")),
    ],
    unknown_keys: RecordPolicy::Fixed(UnknownKeyPolicy::Reject),
    removed: &[],
};

static SONGS: ListSpec = ListSpec {
    item: K::Record(&TRACK),
    min_len: 1,
    unique: Uniqueness::Key("name"),
};

static CATEGORY: RecordSpec = RecordSpec {
    fields: &[
        F::required("category", K::Name(&[R::ProtocolSafe])),
        F::required("songs", K::List(&SONGS)),
    ],
    unknown_keys: RecordPolicy::Fixed(UnknownKeyPolicy::Reject),
    removed: &[],
};

static MUSIC: ListSpec = ListSpec {
    item: K::Record(&CATEGORY),
    min_len: 0,
    unique: Uniqueness::None,
};

/// Built-in schema of a document kind.
pub fn builtin(kind: DocumentKind) -> Schema {
    let shape = match kind {
        DocumentKind::Settings => Shape::Record(&SETTINGS),
        DocumentKind::Backgrounds => Shape::List {
            root_key: "backgrounds",
            list: &BACKGROUNDS,
        },
        DocumentKind::Gimp => Shape::List {
            root_key: "messages",
            list: &GIMP,
        },
        DocumentKind::Areas => Shape::List {
            root_key: "areas",
            list: &AREAS,
        },
        DocumentKind::Music => Shape::List {
            root_key: "music",
            list: &MUSIC,
        },
    };
    Schema {
        kind,
        shape,
        unknown_keys: UnknownKeyPolicy::Warn,
    }
}
