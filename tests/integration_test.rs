// Copyright 2025 JiangLong.
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

#[cfg(test)]
mod tests {
    use asset_store_stack::infrastructure::aws::template::referenced_id;
    use asset_store_stack::infrastructure::constants::*;
    use asset_store_stack::*;
    use serde_json::{json, Value};

    fn create_test_config() -> StackConfig {
        StackConfig {
            domain_name: "example.com".to_string(),
            ..StackConfig::default()
        }
    }

    async fn define_stack(conf: &StackConfig) -> Result<(App, AssetStoreStack)> {
        let zones = StaticZoneProvider::new().with_zone("example.com", "/hostedzone/Z0EXAMPLE");
        let mut app = App::new();
        let defined = AssetStoreStack::define(&mut app, conf, &zones).await?;
        Ok((app, defined))
    }

    async fn synthesize(conf: &StackConfig) -> (App, Template) {
        let (app, defined) = define_stack(conf).await.unwrap();
        let template = {
            let stack = app.stack(&defined.stack_name).unwrap();
            TemplateSynthesizer::new(stack).synthesize().unwrap()
        };
        (app, template)
    }

    fn props<'a>(template: &'a Template, id: &str) -> &'a Value {
        &template.resource(id).unwrap().properties
    }

    #[tokio::test]
    async fn test_plan_order_for_example_domain() {
        let (app, template) = synthesize(&create_test_config()).await;
        let stack = app.stack(DEFAULT_STACK_NAME).unwrap();
        let plan = Plan::build(stack, &template, None).unwrap();

        let order: Vec<(&str, ActionType)> = plan
            .actions
            .iter()
            .map(|a| (a.logical_id.as_str(), a.action_type))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Zone", ActionType::Lookup),
                ("AssetStoreCertificate", ActionType::Create),
                ("AssetStoreBucket", ActionType::Create),
                ("AssetStoreBucketPolicy", ActionType::Create),
                ("AssetStoreBucketAutoDeleteObjectsCustomResource", ActionType::Create),
                (AUTO_DELETE_PROVIDER_ROLE, ActionType::Create),
                (AUTO_DELETE_PROVIDER_HANDLER, ActionType::Create),
                ("AssetStoreDistributionOrigin1S3Origin", ActionType::Create),
                ("AssetStoreDistribution", ActionType::Create),
                ("AssetStoreAliasRecord", ActionType::Create),
            ]
        );

        assert_eq!(plan.actions[0].description, "hosted zone example.com (Z0EXAMPLE)");
        assert_eq!(
            plan.actions[1].description,
            "certificate for example.com, *.example.com"
        );
        assert_eq!(
            plan.actions[8].description,
            "distribution for assets.example.com"
        );
        assert_eq!(
            plan.actions[9].description,
            "A alias assets.example.com -> AssetStoreDistribution"
        );
        assert_eq!(
            plan.actions[8].depends_on,
            vec!["AssetStoreBucket", "AssetStoreCertificate"]
        );
        assert!(plan.has_changes);
    }

    #[tokio::test]
    async fn test_certificate_has_single_covering_wildcard() {
        let (_, template) = synthesize(&create_test_config()).await;
        let cert = props(&template, LOGICAL_ID_CERTIFICATE);

        assert_eq!(cert["DomainName"], "example.com");
        assert_eq!(cert["SubjectAlternativeNames"], json!(["*.example.com"]));
        assert_eq!(cert["ValidationMethod"], "DNS");
        for option in cert["DomainValidationOptions"].as_array().unwrap() {
            assert_eq!(option["HostedZoneId"], "Z0EXAMPLE");
        }
    }

    #[tokio::test]
    async fn test_bucket_public_read_by_policy_with_acls_blocked() {
        let (_, template) = synthesize(&create_test_config()).await;
        let bucket = props(&template, LOGICAL_ID_BUCKET);

        assert_eq!(bucket["BucketName"], DEFAULT_BUCKET_NAME);
        assert_eq!(bucket["AccessControl"], "BucketOwnerFullControl");
        let block = &bucket["PublicAccessBlockConfiguration"];
        assert_eq!(block["BlockPublicAcls"], true);
        assert_eq!(block["IgnorePublicAcls"], true);
        assert_eq!(block["BlockPublicPolicy"], false);
        assert_eq!(block["RestrictPublicBuckets"], false);

        let policy = props(&template, "AssetStoreBucketPolicy");
        assert_eq!(policy["Bucket"], json!({"Ref": LOGICAL_ID_BUCKET}));
        let public_read = policy["PolicyDocument"]["Statement"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["Principal"]["AWS"] == "*")
            .expect("public read statement");
        assert_eq!(public_read["Action"], "s3:GetObject");
        assert_eq!(public_read["Effect"], "Allow");
    }

    #[tokio::test]
    async fn test_distribution_serves_bucket_read_only() {
        let (_, template) = synthesize(&create_test_config()).await;
        let config = &props(&template, LOGICAL_ID_DISTRIBUTION)["DistributionConfig"];

        assert_eq!(config["Aliases"], json!(["assets.example.com"]));
        assert_eq!(
            config["DefaultCacheBehavior"]["AllowedMethods"],
            json!(["GET", "HEAD", "OPTIONS"])
        );
        assert_eq!(config["DefaultCacheBehavior"]["Compress"], true);
        assert_eq!(
            config["DefaultCacheBehavior"]["ViewerProtocolPolicy"],
            "redirect-to-https"
        );
        assert_eq!(
            config["ViewerCertificate"]["MinimumProtocolVersion"],
            "TLSv1.2_2021"
        );
        assert_eq!(
            referenced_id(&config["Origins"][0]["DomainName"]),
            Some(LOGICAL_ID_BUCKET)
        );
        assert_eq!(
            referenced_id(&config["ViewerCertificate"]["AcmCertificateArn"]),
            Some(LOGICAL_ID_CERTIFICATE)
        );
    }

    #[tokio::test]
    async fn test_alias_record_targets_distribution() {
        let (_, template) = synthesize(&create_test_config()).await;
        let record = props(&template, LOGICAL_ID_RECORD);

        assert_eq!(record["Name"], "assets.example.com.");
        assert_eq!(record["Type"], "A");
        assert_eq!(record["HostedZoneId"], "Z0EXAMPLE");
        assert_eq!(
            referenced_id(&record["AliasTarget"]["DNSName"]),
            Some(LOGICAL_ID_DISTRIBUTION)
        );
    }

    #[tokio::test]
    async fn test_disposable_teardown_policies() {
        let (_, template) = synthesize(&create_test_config()).await;
        let rendered = template.to_value();

        for id in [LOGICAL_ID_CERTIFICATE, LOGICAL_ID_BUCKET] {
            assert_eq!(rendered["Resources"][id]["DeletionPolicy"], "Delete");
            assert_eq!(rendered["Resources"][id]["UpdateReplacePolicy"], "Delete");
        }
        assert_eq!(
            props(&template, LOGICAL_ID_BUCKET)["Tags"][0]["Key"],
            TAG_AUTO_DELETE_OBJECTS
        );
        assert!(rendered["Resources"].get("Zone").is_none());
    }

    #[tokio::test]
    async fn test_retain_profile_drops_auto_delete() {
        let mut conf = create_test_config();
        conf.removal_profile = RemovalProfile::Retain;
        let (_, template) = synthesize(&conf).await;
        let rendered = template.to_value();

        assert_eq!(
            rendered["Resources"][LOGICAL_ID_BUCKET]["DeletionPolicy"],
            "Retain"
        );
        assert!(template.resources_of_type(TYPE_AUTO_DELETE).next().is_none());
        assert!(template.resources_of_type(TYPE_LAMBDA_FUNCTION).next().is_none());
    }

    #[tokio::test]
    async fn test_outputs() {
        let (_, template) = synthesize(&create_test_config()).await;
        let rendered = template.to_value();

        assert_eq!(
            rendered["Outputs"]["AssetUrl"]["Value"],
            "https://assets.example.com"
        );
        assert_eq!(
            rendered["Outputs"]["DistributionDomainName"]["Value"],
            json!({"Fn::GetAtt": [LOGICAL_ID_DISTRIBUTION, "DomainName"]})
        );
        assert_eq!(rendered["AWSTemplateFormatVersion"], TEMPLATE_FORMAT_VERSION);
    }

    #[tokio::test]
    async fn test_missing_zone_fails_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let zones = ContextFileZoneProvider::new(dir.path().join("absent.json"));
        let mut app = App::new();

        let err = AssetStoreStack::define(&mut app, &create_test_config(), &zones)
            .await
            .unwrap_err();
        match err {
            StackError::ZoneNotFound { domain, .. } => assert_eq!(domain, "example.com"),
            other => panic!("unexpected error: {}", other),
        }
        assert!(app.stacks().is_empty());
    }

    #[tokio::test]
    async fn test_zone_resolved_from_context_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONTEXT_FILE);
        let key = ZoneQuery::new("example.com", &Environment::default()).context_key();
        let mut context = serde_json::Map::new();
        context.insert(
            key,
            json!({"Id": "/hostedzone/Z0CONTEXT", "Name": "example.com."}),
        );
        std::fs::write(&path, Value::Object(context).to_string()).unwrap();

        let zones = ChainedZoneProvider::new()
            .push(Box::new(StaticZoneProvider::new()))
            .push(Box::new(ContextFileZoneProvider::new(&path)));
        let mut app = App::new();
        let defined = AssetStoreStack::define(&mut app, &create_test_config(), &zones)
            .await
            .unwrap();

        let stack = app.stack(&defined.stack_name).unwrap();
        let zone = stack.graph.resolve(&defined.zone).unwrap();
        assert_eq!(zone.hosted_zone_id, "Z0CONTEXT");
    }

    #[tokio::test]
    async fn test_certificate_region_enforced() {
        let mut conf = create_test_config();
        conf.env.region = Some("eu-west-1".to_string());
        let err = define_stack(&conf).await.unwrap_err();
        assert!(matches!(err, StackError::ValidationError(_)));

        conf.env.region = Some(CERTIFICATE_REGION.to_string());
        assert!(define_stack(&conf).await.is_ok());
    }

    #[tokio::test]
    async fn test_plan_against_identical_template_is_unchanged() {
        let (app, template) = synthesize(&create_test_config()).await;
        let stack = app.stack(DEFAULT_STACK_NAME).unwrap();
        let previous = template.to_value();

        let plan = Plan::build(stack, &template, Some(&previous)).unwrap();
        assert!(!plan.has_changes);
        assert!(plan
            .actions
            .iter()
            .all(|a| matches!(a.action_type, ActionType::Lookup | ActionType::NoOp)));
        assert_eq!(plan.summary().lookup, 1);
    }

    #[tokio::test]
    async fn test_plan_detects_update_and_delete() {
        let (app, template) = synthesize(&create_test_config()).await;
        let stack = app.stack(DEFAULT_STACK_NAME).unwrap();

        let mut previous = template.to_value();
        previous["Resources"][LOGICAL_ID_BUCKET]["Properties"]["BucketName"] = json!("old-bucket");
        previous["Resources"]["LegacyTopic"] = json!({"Type": "AWS::SNS::Topic"});

        let plan = Plan::build(stack, &template, Some(&previous)).unwrap();
        let summary = plan.summary();
        assert_eq!(summary.update, 1);
        assert_eq!(summary.delete, 1);
        assert_eq!(plan.actions_by_type(ActionType::Update)[0].logical_id, LOGICAL_ID_BUCKET);

        let last = plan.actions.last().unwrap();
        assert_eq!(last.logical_id, "LegacyTopic");
        assert_eq!(last.action_type, ActionType::Delete);
    }

    #[tokio::test]
    async fn test_write_assembly() {
        let (app, _) = synthesize(&create_test_config()).await;
        let dir = tempfile::tempdir().unwrap();

        let written = asset_store_stack::infrastructure::aws::template::write_assembly(
            &app,
            dir.path(),
            TemplateFormat::Yaml,
        )
        .unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("AssetStoreStack.template.yaml").exists());

        let manifest: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(MANIFEST_FILE_NAME)).unwrap(),
        )
        .unwrap();
        let entry = &manifest["stacks"][DEFAULT_STACK_NAME];
        assert_eq!(entry["templateFile"], "AssetStoreStack.template.yaml");
        assert_eq!(entry["environment"], "aws://unknown-account/unknown-region");
        assert_eq!(entry["resourceCount"], 9);

        let previous = asset_store_stack::infrastructure::aws::plan::load_previous_template(
            &dir.path().join("AssetStoreStack.template.yaml"),
        )
        .unwrap();
        assert_eq!(
            previous["Resources"][LOGICAL_ID_BUCKET]["Type"],
            TYPE_BUCKET
        );
    }
}
