//! Direct calls and HTTP calls must be indistinguishable
//!
//! Two controllers start from the same state. One is driven directly, the
//! other through a live server and the blocking client. Every reply, every
//! changeset and the final state must match.

use std::sync::Arc;

use amp_api::{
    AmpController, Command, CommandReply, CommandSurface, ControllerConfig, DeleteGroup, ErrorKind,
    SetGroup, SetZone,
};
use amp_client::{AmpClient, ClientError};
use amp_hardware::MockHardware;
use amp_server::ApiServer;
use amp_state::{ChangeTracker, Changeset, Group, GroupId, SourceId, State, ZoneId};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

fn initial_state() -> State {
    let mut state = State::with_counts(4, 6);
    state.groups = vec![
        Group::new(GroupId(0), "Upstairs", vec![ZoneId(0), ZoneId(1), ZoneId(2)]),
        Group::new(GroupId(1), "Downstairs", vec![ZoneId(3), ZoneId(4)]),
        Group::new(GroupId(2), "Outside", vec![ZoneId(5)]),
    ];
    state
}

/// Controller over a mock whose zone 5 amplifier always refuses writes
fn controller() -> Arc<AmpController> {
    let hw = Arc::new(MockHardware::new());
    hw.fail_zone(ZoneId(5));
    let controller =
        AmpController::with_state(hw, ControllerConfig::default(), initial_state()).unwrap();
    Arc::new(controller)
}

fn envelopes() -> Vec<Value> {
    vec![
        json!({"command": "set_power", "audio_power": true, "usb_power": true}),
        json!({"command": "set_source", "id": 1, "name": "cd player", "digital": false}),
        json!({"command": "set_zone", "id": 2, "name": "whole house", "source_id": 2,
               "mute": false, "stby": false, "vol": -9, "disabled": false}),
        json!({"command": "create_group", "name": "super_group", "zones": [0, 1, 2, 3, 4]}),
        json!({"command": "set_group", "id": 3, "source_id": 1, "vol": -30}),
        // errors of every kind
        json!({"command": "set_zone", "id": 9, "vol": -10}),
        json!({"command": "set_zone", "id": 1, "vol": 6}),
        json!({"command": "set_group", "id": 3, "zones": []}),
        json!({"command": "create_group", "name": "dup", "zones": [1, 1]}),
        json!({"command": "reboot"}),
        json!({"id": 1}),
        json!({"command": "set_zone", "id": 5, "vol": -20}),
        json!({"command": "set_group", "id": 2, "muted": true}),
        // back to successes
        json!({"command": "set_group", "id": 0, "name": "Upper floor", "zones": [0, 1]}),
        json!({"command": "delete_group", "id": 3}),
        json!({"command": "delete_group", "id": 3}),
        json!({"command": "set_power", "audio_power": false, "usb_power": true}),
    ]
}

fn run<S: CommandSurface>(surface: &S) -> (Vec<(CommandReply, Changeset)>, State) {
    let mut tracker = ChangeTracker::new(surface.state().unwrap());
    let steps = envelopes()
        .iter()
        .map(|envelope| {
            let reply = surface.submit(envelope).unwrap();
            let changes = tracker.update(&surface.state().unwrap());
            (reply, changes)
        })
        .collect();
    (steps, surface.state().unwrap())
}

#[test]
fn test_http_matches_direct_calls() {
    let rt = Runtime::new().unwrap();
    let server = rt
        .block_on(ApiServer::start("127.0.0.1:0".parse().unwrap(), controller()))
        .unwrap();
    let client = AmpClient::new(server.base_url());

    let (direct_steps, direct_state) = run(&*controller());
    let (http_steps, http_state) = run(&client);

    assert_eq!(direct_steps.len(), http_steps.len());
    for (i, (direct, http)) in direct_steps.iter().zip(&http_steps).enumerate() {
        assert_eq!(direct.0, http.0, "reply of step {i}");
        assert_eq!(direct.1, http.1, "changes of step {i}");
    }
    assert_eq!(direct_state, http_state);

    let kinds: Vec<Option<ErrorKind>> = http_steps.iter().map(|(r, _)| r.error_kind()).collect();
    assert_eq!(
        kinds,
        vec![
            None,
            None,
            None,
            None,
            None,
            Some(ErrorKind::NotFound),
            Some(ErrorKind::Validation),
            Some(ErrorKind::Validation),
            Some(ErrorKind::Validation),
            Some(ErrorKind::UnknownCommand),
            Some(ErrorKind::Validation),
            Some(ErrorKind::Hardware),
            Some(ErrorKind::Hardware),
            None,
            None,
            Some(ErrorKind::NotFound),
            None,
        ]
    );

    rt.block_on(server.shutdown());
}

#[test]
fn test_transport_failures_are_not_command_errors() {
    let rt = Runtime::new().unwrap();
    let server = rt
        .block_on(ApiServer::start("127.0.0.1:0".parse().unwrap(), controller()))
        .unwrap();
    let base_url = server.base_url().to_string();
    rt.block_on(server.shutdown());

    let client = AmpClient::new(base_url);
    let err = client
        .send_cmd(&json!({"command": "delete_group", "id": 0}))
        .unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "{err}");
}

#[test]
fn test_typed_commands_over_http() {
    let rt = Runtime::new().unwrap();
    let server = rt
        .block_on(ApiServer::start("127.0.0.1:0".parse().unwrap(), controller()))
        .unwrap();
    let client = AmpClient::new(server.base_url());

    let commands: Vec<Command> = vec![
        SetZone::new(ZoneId(1)).source(SourceId(2)).volume(-25).into(),
        SetGroup::new(GroupId(0)).name("Top floor").muted(true).into(),
        DeleteGroup::new(GroupId(2)).into(),
    ];
    for command in &commands {
        let reply = client.send(command).unwrap();
        assert!(reply.is_ok(), "{}: {reply:?}", command.name());
    }

    let state = client.get_state().unwrap();
    assert_eq!(state.zones[1].source_id, SourceId(2));
    assert_eq!(state.zones[1].volume, -25);
    assert_eq!(state.group(GroupId(0)).map(|g| g.name.as_str()), Some("Top floor"));
    assert!(state.zones[0..3].iter().all(|z| z.muted));
    assert!(state.group(GroupId(2)).is_none());

    let reply = client.send(&DeleteGroup::new(GroupId(2)).into()).unwrap();
    assert_eq!(reply.error_kind(), Some(ErrorKind::NotFound));

    rt.block_on(server.shutdown());
}
