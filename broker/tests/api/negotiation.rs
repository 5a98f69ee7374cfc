use serde_json::json;

use crate::helper::{assert_silent, TestApp};
use signaling::message::{ClientEvent, ClientRequest, RobotEvent, RobotId, RobotRequest};

#[actix_web::test]
async fn offer_update_reaches_the_client_and_the_registry() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    let mut robot = app.robot().await;
    let robot_id = robot.register("R1", None).await?;
    assert!(matches!(client.recv().await?, ClientEvent::Register { .. }));

    robot
        .send(&RobotRequest::Offer {
            robot_id,
            sdp_offer: json!("X"),
        })
        .await?;

    assert_eq!(
        client.recv().await?,
        ClientEvent::Offer {
            robot_id,
            sdp_offer: json!("X"),
        }
    );
    let robots = client.robots().await?;
    assert_eq!(robots[0].sdp_offer, Some(json!("X")));
    Ok(())
}

#[actix_web::test]
async fn offer_for_unknown_robot_id_is_silently_ignored() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    let mut robot = app.robot().await;
    robot.register("R1", None).await?;
    assert!(matches!(client.recv().await?, ClientEvent::Register { .. }));

    robot
        .send(&RobotRequest::Offer {
            robot_id: RobotId(99),
            sdp_offer: json!("X"),
        })
        .await?;

    assert_silent(client.recv()).await;
    let robots = client.robots().await?;
    assert_eq!(robots[0].sdp_offer, None);
    Ok(())
}

#[actix_web::test]
async fn robot_candidates_are_relayed_in_submission_order() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    let mut robot = app.robot().await;
    let robot_id = robot.register("R1", None).await?;
    assert!(matches!(client.recv().await?, ClientEvent::Register { .. }));

    for candidate in ["c1", "c2"] {
        robot
            .send(&RobotRequest::Candidate {
                robot_id,
                candidate: json!(candidate),
            })
            .await?;
    }

    for candidate in ["c1", "c2"] {
        assert_eq!(
            client.recv().await?,
            ClientEvent::Candidate {
                robot_id,
                candidate: json!(candidate),
            }
        );
    }
    let robots = client.robots().await?;
    assert_eq!(robots[0].robot_candidates, vec![json!("c1"), json!("c2")]);
    Ok(())
}

#[actix_web::test]
async fn answer_is_routed_to_the_named_robot() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    let mut robot = app.robot().await;
    let robot_id = robot.register("R1", None).await?;
    assert!(matches!(client.recv().await?, ClientEvent::Register { .. }));

    client
        .send(&ClientRequest::Answer {
            robot_id,
            sdp_answer: json!("A"),
        })
        .await?;

    assert_eq!(
        robot.recv().await?,
        RobotEvent::SdpAnswer {
            sdp_answer: json!("A"),
        }
    );
    let robots = client.robots().await?;
    assert_eq!(robots[0].sdp_answer, Some(json!("A")));
    Ok(())
}

#[actix_web::test]
async fn client_candidates_are_routed_in_submission_order() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    let mut robot = app.robot().await;
    let robot_id = robot.register("R1", None).await?;
    assert!(matches!(client.recv().await?, ClientEvent::Register { .. }));

    for candidate in ["x1", "x2"] {
        client
            .send(&ClientRequest::Candidate {
                robot_id,
                candidate: json!(candidate),
            })
            .await?;
    }

    for candidate in ["x1", "x2"] {
        assert_eq!(
            robot.recv().await?,
            RobotEvent::Candidate {
                candidate: json!(candidate),
            }
        );
    }
    let robots = client.robots().await?;
    assert_eq!(robots[0].client_candidates, vec![json!("x1"), json!("x2")]);
    Ok(())
}

#[actix_web::test]
async fn answer_for_unknown_robot_id_is_silently_ignored() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut client = app.client().await;

    let mut robot = app.robot().await;
    robot.register("R1", None).await?;

    client
        .send(&ClientRequest::Answer {
            robot_id: RobotId(99),
            sdp_answer: json!("A"),
        })
        .await?;

    assert_silent(robot.recv()).await;
    Ok(())
}

#[actix_web::test]
async fn a_new_client_connection_supersedes_the_previous_one() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let mut first = app.client().await;

    let mut robot = app.robot().await;
    robot.register("R1", None).await?;
    assert!(matches!(first.recv().await?, ClientEvent::Register { .. }));

    let mut second = app.client().await;

    let mut late_robot = app.robot().await;
    late_robot.register("R2", None).await?;

    match second.recv().await? {
        ClientEvent::Register { robot } => assert_eq!(robot.name, "R2"),
        other => panic!("Expected register event, got {other:?}"),
    }
    assert_silent(first.recv()).await;
    Ok(())
}
