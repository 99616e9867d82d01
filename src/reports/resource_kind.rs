use strum::{Display, EnumIter};

/// One category of collected data, each written to its own CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Projects,
    Teams,
    #[strum(serialize = "team members")]
    TeamMembers,
    Repositories,
    #[strum(serialize = "area paths")]
    AreaPaths,
    #[strum(serialize = "team area paths")]
    TeamAreaPaths,
    Commits,
    #[strum(serialize = "all commits")]
    AllCommits,
    Pushes,
    Builds,
    #[strum(serialize = "build artifacts")]
    BuildArtifacts,
    #[strum(serialize = "pull requests")]
    PullRequests,
}

const COMMIT_HEADER: &str = "projecturl,repository,branch,isinternal,authordate,authoremail,authorname,add,delete,edit,commitid,committerdate,year,month,day,dayofweek,weekofyear,hour,committeremail,committername,remoteurl,comment";

impl ResourceKind {
    /// Collection-level kinds are written once per run to an unprefixed file.
    #[must_use]
    pub const fn is_collection_level(self) -> bool {
        matches!(self, Self::Projects | Self::Teams | Self::TeamMembers)
    }

    const fn file_stem(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Teams => "teams",
            Self::TeamMembers => "teammembers",
            Self::Repositories => "repositories",
            Self::AreaPaths => "areapaths",
            Self::TeamAreaPaths => "teamareapaths",
            Self::Commits => "commits",
            Self::AllCommits => "allcommits",
            Self::Pushes => "pushes",
            Self::Builds => "builds",
            Self::BuildArtifacts => "buildartifacts",
            Self::PullRequests => "pullrequests",
        }
    }

    /// The file this kind is written to, e.g. `Fabrikam-commits.csv` or `projects.csv`.
    #[must_use]
    pub fn file_name(self, prefix: &str) -> String {
        if self.is_collection_level() {
            format!("{}.csv", self.file_stem())
        } else {
            format!("{prefix}-{}.csv", self.file_stem())
        }
    }

    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Projects => "collectionurl,id,name",
            Self::Teams => "collectionurl,teamid,teamname,projectName",
            Self::TeamMembers => "collectionurl,projectName,teamname,isTeamAdmin,displayName,uniqueName",
            Self::Repositories => "projecturl,defaultBranch,id,name,project,remoteUrl,sshUrl,url,webUrl,size,isDisabled",
            Self::AreaPaths => "projecturl,areapath,name",
            Self::TeamAreaPaths => "projecturl,teamname,areapath,includechildren",
            Self::Commits | Self::AllCommits => COMMIT_HEADER,
            Self::Pushes => {
                "projecturl,repository,branch,pushid,pushdate,year,month,day,dayofweek,weekofyear,hour,uniquename,displayname,remoteurl"
            }
            Self::Builds => {
                "projecturl,id,reason,buildNumber,definition,result,requestedfor,uniqueName,repository,starttime,year,month,day,dayofweek,weekofyear,hour,finishtime,queuetime,totalminutes"
            }
            Self::BuildArtifacts => "projecturl,buildid,buildNumber,definition,artifactid,artifactname,artifactsize",
            Self::PullRequests => {
                "projecturl,id,repository,targetrefname,reviewercount,mergestrategy,creationdate,closeddate,createdby,uniqueName,year,month,day,dayofweek,weekofyear,hour,totalhours,totaldays"
            }
        }
    }
}
